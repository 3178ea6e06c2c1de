use glam::Vec3;

/// Number of mousedowns that landed on a shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickCounter {
    count: u64,
}

impl ClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u64 {
        self.count
    }

    pub fn increment(&mut self) -> u64 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn label(&self) -> String {
        format!("Shapes Clicked: {}", self.count)
    }
}

/// Crosshair border color: red while a shape is under the screen center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CrosshairColor {
    #[default]
    White,
    Red,
}

impl CrosshairColor {
    pub fn from_hit(hit: bool) -> Self {
        if hit {
            Self::Red
        } else {
            Self::White
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Red => "red",
        }
    }

    /// Linear RGB used when the renderer draws the crosshair itself.
    pub fn rgb(self) -> Vec3 {
        match self {
            Self::White => Vec3::ONE,
            Self::Red => Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

/// Where the counter text and crosshair color end up on a given platform.
pub trait HudSink {
    fn show_counter(&mut self, text: &str);
    fn show_crosshair(&mut self, color: CrosshairColor);
}

/// Pushes HUD changes to a [`HudSink`], skipping values it already shows.
#[derive(Debug, Default)]
pub struct HudPresenter {
    counter: Option<u64>,
    crosshair: Option<CrosshairColor>,
}

impl HudPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present(
        &mut self,
        sink: &mut dyn HudSink,
        counter: &ClickCounter,
        crosshair: CrosshairColor,
    ) {
        if self.counter != Some(counter.value()) {
            sink.show_counter(&counter.label());
            self.counter = Some(counter.value());
        }
        if self.crosshair != Some(crosshair) {
            sink.show_crosshair(crosshair);
            self.crosshair = Some(crosshair);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use title::TitleHud;

#[cfg(not(target_arch = "wasm32"))]
mod title {
    use std::sync::Arc;

    use winit::window::Window;

    use super::{CrosshairColor, HudSink};

    /// Desktop HUD: the counter goes into the window title, the crosshair is drawn by the renderer.
    pub struct TitleHud {
        window: Arc<Window>,
        prefix: String,
    }

    impl TitleHud {
        pub fn new(window: Arc<Window>, prefix: impl Into<String>) -> Self {
            Self {
                window,
                prefix: prefix.into(),
            }
        }
    }

    impl HudSink for TitleHud {
        fn show_counter(&mut self, text: &str) {
            self.window.set_title(&format!("{} | {text}", self.prefix));
        }

        fn show_crosshair(&mut self, _color: CrosshairColor) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        counters: Vec<String>,
        crosshairs: Vec<CrosshairColor>,
    }

    impl HudSink for RecordingSink {
        fn show_counter(&mut self, text: &str) {
            self.counters.push(text.to_string());
        }

        fn show_crosshair(&mut self, color: CrosshairColor) {
            self.crosshairs.push(color);
        }
    }

    #[test]
    fn counter_starts_at_zero_and_counts_up() {
        let mut counter = ClickCounter::new();
        assert_eq!(counter.label(), "Shapes Clicked: 0");
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.label(), "Shapes Clicked: 2");
    }

    #[test]
    fn crosshair_follows_hit() {
        assert_eq!(CrosshairColor::from_hit(true).css(), "red");
        assert_eq!(CrosshairColor::from_hit(false).css(), "white");
    }

    #[test]
    fn presenter_only_forwards_changes() {
        let mut sink = RecordingSink::default();
        let mut presenter = HudPresenter::new();
        let mut counter = ClickCounter::new();

        presenter.present(&mut sink, &counter, CrosshairColor::White);
        presenter.present(&mut sink, &counter, CrosshairColor::White);
        presenter.present(&mut sink, &counter, CrosshairColor::Red);
        counter.increment();
        presenter.present(&mut sink, &counter, CrosshairColor::Red);

        assert_eq!(sink.counters, vec!["Shapes Clicked: 0", "Shapes Clicked: 1"]);
        assert_eq!(
            sink.crosshairs,
            vec![CrosshairColor::White, CrosshairColor::Red]
        );
    }
}
