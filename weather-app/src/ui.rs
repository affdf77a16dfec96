//! Slint markup for the main window and conversions from core scene types.

use anyhow::{Context, Result};
use slint::{Image, Rgba8Pixel, SharedPixelBuffer};
use weather_core::scene::{Color, Shape, ShapeKind};

slint::slint! {
    import { Button, LineEdit } from "std-widgets.slint";

    export struct SceneShape {
        x: length,
        y: length,
        width: length,
        height: length,
        color: color,
        radius: length,
        opacity: float,
    }

    export struct ForecastCardData {
        date: string,
        icon: image,
        temperature: string,
    }

    component ShapeLayer inherits Rectangle {
        in property <[SceneShape]> shapes;

        for shape in root.shapes: Rectangle {
            x: shape.x;
            y: shape.y;
            width: shape.width;
            height: shape.height;
            background: shape.color;
            border-radius: shape.radius;
            opacity: shape.opacity;
        }
    }

    component ForecastCardView inherits Rectangle {
        in property <ForecastCardData> card;

        width: 100px;
        height: 120px;
        background: rgba(45, 45, 64, 0.47);
        border-radius: 10px;

        VerticalLayout {
            padding: 5px;
            spacing: 5px;
            alignment: center;

            Text {
                text: root.card.date;
                font-size: 14px;
                color: white;
                horizontal-alignment: center;
            }

            HorizontalLayout {
                alignment: center;
                Image {
                    source: root.card.icon;
                    width: 50px;
                    height: 50px;
                }
            }

            Text {
                text: root.card.temperature;
                font-size: 16px;
                font-weight: 700;
                color: white;
                horizontal-alignment: center;
            }
        }
    }

    export component AppWindow inherits Window {
        title: "Weather";
        preferred-width: 900px;
        preferred-height: 680px;
        background: rgb(30, 30, 60);

        in-out property <string> city;
        in property <string> temperature;
        in property <string> feels-like;
        in property <string> humidity;
        in property <string> pressure;
        in property <string> wind;
        in property <string> description;
        in property <string> sun;
        in property <image> condition-icon;
        in property <[ForecastCardData]> forecast;
        in property <[SceneShape]> sky-shapes;
        in property <[SceneShape]> ground-shapes;
        in property <[SceneShape]> weather-shapes;
        in property <string> error-message;
        out property <length> scene-width: canvas.width;
        out property <length> scene-height: canvas.height;

        callback get-weather(string);
        callback scene-resized(length, length);
        callback dismiss-error();

        VerticalLayout {
            HorizontalLayout {
                padding: 10px;
                spacing: 10px;

                LineEdit {
                    placeholder-text: "City";
                    text <=> root.city;
                    accepted(text) => {
                        root.get-weather(text);
                    }
                }

                Button {
                    text: "Get weather";
                    clicked => {
                        root.get-weather(root.city);
                    }
                }
            }

            HorizontalLayout {
                padding-left: 10px;
                padding-right: 10px;
                spacing: 20px;
                alignment: start;

                Image {
                    source: root.condition-icon;
                    width: 100px;
                    height: 100px;
                }

                VerticalLayout {
                    spacing: 2px;

                    Text {
                        text: root.temperature;
                        font-size: 36px;
                        color: white;
                    }
                    Text {
                        text: root.description;
                        font-size: 16px;
                        color: white;
                    }
                    Text { text: root.feels-like; color: rgb(208, 208, 224); }
                    Text { text: root.humidity; color: rgb(208, 208, 224); }
                    Text { text: root.pressure; color: rgb(208, 208, 224); }
                    Text { text: root.wind; color: rgb(208, 208, 224); }
                    Text { text: root.sun; color: rgb(208, 208, 224); }
                }
            }

            HorizontalLayout {
                padding: 10px;
                spacing: 10px;
                alignment: start;

                for card in root.forecast: ForecastCardView {
                    card: card;
                }
            }

            canvas := Rectangle {
                clip: true;
                min-height: 150px;
                vertical-stretch: 1;

                changed width => {
                    root.scene-resized(self.width, self.height);
                }
                changed height => {
                    root.scene-resized(self.width, self.height);
                }

                ShapeLayer {
                    x: 0px;
                    y: 0px;
                    width: parent.width;
                    height: parent.height;
                    shapes: root.sky-shapes;
                }
                ShapeLayer {
                    x: 0px;
                    y: 0px;
                    width: parent.width;
                    height: parent.height;
                    shapes: root.ground-shapes;
                }
                ShapeLayer {
                    x: 0px;
                    y: 0px;
                    width: parent.width;
                    height: parent.height;
                    shapes: root.weather-shapes;
                }
            }
        }

        if root.error-message != "": Rectangle {
            x: 0px;
            y: 0px;
            width: root.width;
            height: root.height;
            background: rgba(0, 0, 0, 0.63);

            TouchArea { }

            Rectangle {
                width: min(root.width - 40px, 420px);
                height: 200px;
                x: (parent.width - self.width) / 2;
                y: (parent.height - self.height) / 2;
                background: rgb(45, 45, 64);
                border-radius: 10px;

                VerticalLayout {
                    padding: 15px;
                    spacing: 10px;

                    Text {
                        text: root.error-message;
                        color: white;
                        wrap: word-wrap;
                        vertical-stretch: 1;
                    }

                    Button {
                        text: "OK";
                        clicked => {
                            root.dismiss-error();
                        }
                    }
                }
            }
        }
    }
}

pub fn scene_shape(shape: &Shape) -> SceneShape {
    let bounds = shape.bounds;
    let radius = match shape.kind {
        ShapeKind::Ellipse => bounds.width.min(bounds.height) / 2.0,
        ShapeKind::Rectangle | ShapeKind::Line => 0.0,
    };

    SceneShape {
        x: bounds.x as f32,
        y: bounds.y as f32,
        width: bounds.width as f32,
        height: bounds.height as f32,
        color: slint_color(shape.fill),
        radius: radius as f32,
        opacity: shape.opacity,
    }
}

pub fn scene_shapes(shapes: &[Shape]) -> Vec<SceneShape> {
    shapes.iter().map(scene_shape).collect()
}

fn slint_color(color: Color) -> slint::Color {
    slint::Color::from_rgb_u8(color.r, color.g, color.b)
}

/// Decodes a PNG (as served for condition icons) into a Slint image.
pub fn image_from_png(png: &[u8]) -> Result<Image> {
    let rgba = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .context("Failed to decode icon PNG")?
        .into_rgba8();

    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
    );

    Ok(Image::from_rgba8(buffer))
}
