//! Wires the Slint window to the refresh flow and the scene generators.

use async_compat::Compat;
use slint::{ComponentHandle, Model, ModelRc, SharedString, Timer, TimerMode, VecModel, Weak};
use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};
use weather_core::{
    Config, ForecastCard, WeatherProvider, WeatherSnapshot, WeatherView, provider_from_config,
    refresh, report_missing_provider,
    scene::{CanvasSize, Cityscape, WeatherAnimation},
};

use crate::ui::{self, AppWindow, ForecastCardData, SceneShape};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// The looping overlay and when it started.
struct AnimationClock {
    animation: WeatherAnimation,
    started: Instant,
}

/// Models bound to the window, shared between callbacks.
#[derive(Clone)]
struct Models {
    sky: Rc<VecModel<SceneShape>>,
    ground: Rc<VecModel<SceneShape>>,
    weather: Rc<VecModel<SceneShape>>,
    forecast: Rc<VecModel<ForecastCardData>>,
}

impl Models {
    fn new() -> Self {
        Self {
            sky: Rc::new(VecModel::default()),
            ground: Rc::new(VecModel::default()),
            weather: Rc::new(VecModel::default()),
            forecast: Rc::new(VecModel::default()),
        }
    }

    fn bind(&self, window: &AppWindow) {
        window.set_sky_shapes(ModelRc::from(self.sky.clone()));
        window.set_ground_shapes(ModelRc::from(self.ground.clone()));
        window.set_weather_shapes(ModelRc::from(self.weather.clone()));
        window.set_forecast(ModelRc::from(self.forecast.clone()));
    }
}

/// Everything a refresh needs to update the window.
#[derive(Clone)]
struct SlintView {
    window: Weak<AppWindow>,
    config: Rc<Config>,
    models: Models,
    clock: Rc<RefCell<AnimationClock>>,
}

impl SlintView {
    fn with_window(&self, f: impl FnOnce(&AppWindow)) {
        match self.window.upgrade() {
            Some(window) => f(&window),
            None => log::debug!("Window closed, dropping update"),
        }
    }

    fn canvas_size(window: &AppWindow) -> CanvasSize {
        CanvasSize::new(window.get_scene_width() as f64, window.get_scene_height() as f64)
    }

    fn restart_animation(&self, window: &AppWindow, description: &str) {
        let rainy = self.config.is_rainy(description);
        let animation = WeatherAnimation::generate(
            description,
            rainy,
            Self::canvas_size(window),
            &mut rand::thread_rng(),
        );
        log::debug!(
            "Animation for '{description}': {} drops, {} clouds",
            animation.drops.len(),
            animation.clouds.len()
        );

        *self.clock.borrow_mut() = AnimationClock {
            animation,
            started: Instant::now(),
        };
        self.models.weather.set_vec(Vec::new());
    }

    fn draw_cityscape(&self, window: &AppWindow) {
        let size = Self::canvas_size(window);
        match Cityscape::generate(size, &mut rand::thread_rng()) {
            Some(scene) => {
                self.models.sky.set_vec(ui::scene_shapes(&scene.sky_shapes()));
                self.models.ground.set_vec(ui::scene_shapes(&scene.ground_shapes()));
            }
            None => {
                self.models.sky.set_vec(Vec::new());
                self.models.ground.set_vec(Vec::new());
            }
        }
    }

    fn tick(&self) {
        let clock = self.clock.borrow();
        if clock.animation.is_empty() {
            if self.models.weather.row_count() > 0 {
                self.models.weather.set_vec(Vec::new());
            }
            return;
        }

        let frame = clock.animation.frame(clock.started.elapsed());
        self.models.weather.set_vec(ui::scene_shapes(&frame));
    }
}

impl WeatherView for SlintView {
    fn show_current(&mut self, snapshot: &WeatherSnapshot) {
        let labels = snapshot.labels(self.config.units);
        self.with_window(|window| {
            window.set_temperature(labels.temperature.into());
            window.set_feels_like(labels.feels_like.into());
            window.set_humidity(labels.humidity.into());
            window.set_pressure(labels.pressure.into());
            window.set_wind(labels.wind.into());
            window.set_description(labels.description.into());
            window.set_sun(labels.sun.into());
            self.restart_animation(window, &snapshot.description);
        });
    }

    fn show_icon(&mut self, png: Vec<u8>) {
        match ui::image_from_png(&png) {
            Ok(icon) => self.with_window(|window| window.set_condition_icon(icon)),
            Err(e) => log::warn!("{e:#}"),
        }
    }

    fn show_forecast(&mut self, cards: Vec<ForecastCard>) {
        let rows: Vec<ForecastCardData> = cards
            .into_iter()
            .map(|card| ForecastCardData {
                date: card.date.into(),
                icon: slint::Image::default(),
                temperature: card.temperature.into(),
            })
            .collect();
        self.models.forecast.set_vec(rows);
    }

    fn show_card_icon(&mut self, index: usize, png: Vec<u8>) {
        let icon = match ui::image_from_png(&png) {
            Ok(icon) => icon,
            Err(e) => {
                log::warn!("{e:#}");
                return;
            }
        };

        // The row may be gone if a newer refresh replaced the cards.
        if let Some(mut row) = self.models.forecast.row_data(index) {
            row.icon = icon;
            self.models.forecast.set_row_data(index, row);
        }
    }

    fn show_error(&mut self, message: String) {
        self.with_window(|window| {
            let current = window.get_error_message();
            let combined = if current.is_empty() {
                SharedString::from(message)
            } else {
                slint::format!("{current}\n{message}")
            };
            window.set_error_message(combined);
        });
    }

    fn redraw_cityscape(&mut self) {
        self.with_window(|window| self.draw_cityscape(window));
    }
}

/// Opens the main window and runs the event loop until it is closed.
pub fn run(config: Config, initial_city: Option<String>) -> anyhow::Result<()> {
    let window = AppWindow::new()?;
    let config = Rc::new(config);

    let provider: Option<Rc<dyn WeatherProvider>> = match provider_from_config(&config) {
        Ok(provider) => Some(Rc::from(provider)),
        Err(e) => {
            log::warn!("{e}");
            None
        }
    };

    let models = Models::new();
    models.bind(&window);

    let view = SlintView {
        window: window.as_weak(),
        config: config.clone(),
        models,
        clock: Rc::new(RefCell::new(AnimationClock {
            animation: WeatherAnimation::default(),
            started: Instant::now(),
        })),
    };

    window.on_get_weather({
        let view = view.clone();
        move |city| {
            let mut view = view.clone();
            let Some(provider) = provider.clone() else {
                let config = view.config.clone();
                report_missing_provider(&config, &mut view, &city);
                return;
            };
            let city = city.to_string();

            let task = Compat::new(async move {
                let config = view.config.clone();
                refresh(provider.as_ref(), &config, &mut view, &city).await;
            });
            if let Err(e) = slint::spawn_local(task) {
                log::error!("Failed to start refresh: {e}");
            }
        }
    });

    window.on_scene_resized({
        let view = view.clone();
        move |width, height| {
            log::debug!("Canvas resized to {width}x{height}");
            view.with_window(|window| view.draw_cityscape(window));
        }
    });

    window.on_dismiss_error({
        let window_weak = window.as_weak();
        move || {
            if let Some(window) = window_weak.upgrade() {
                window.set_error_message(SharedString::new());
            }
        }
    });

    let frame_timer = Timer::default();
    frame_timer.start(TimerMode::Repeated, FRAME_INTERVAL, {
        let view = view.clone();
        move || view.tick()
    });

    if let Some(city) = initial_city {
        window.set_city(city.into());
        let window_weak = window.as_weak();
        Timer::single_shot(Duration::ZERO, move || {
            if let Some(window) = window_weak.upgrade() {
                window.invoke_get_weather(window.get_city());
            }
        });
    }

    window.run()?;
    Ok(())
}
