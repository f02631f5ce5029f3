use clap::Parser;
use glam::Vec2;
use ssr_core::RealTime;
use ssr_view::{DrawMode, ViewConfig};

/// Remote control for a SoundScape Renderer instance.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Server address as host:port
    #[arg(value_name = "ADDRESS", default_value = "localhost:4711")]
    pub address: String,

    /// Keep sources in place and move the reference instead
    #[arg(long, default_value_t = false)]
    pub sources_fixed: bool,

    /// Width of the virtual view in pixels
    #[arg(long, default_value_t = 480.0)]
    pub width: f32,

    /// Height of the virtual view in pixels
    #[arg(long, default_value_t = 800.0)]
    pub height: f32,

    /// Consumer tick interval in milliseconds
    #[arg(long, default_value_t = 40)]
    pub tick_ms: u64,

    /// Duration of view animations in milliseconds
    #[arg(long, default_value_t = 800)]
    pub animation_ms: i64,
}

impl Args {
    pub fn view_config(&self) -> ViewConfig {
        let draw_mode = if self.sources_fixed {
            DrawMode::SourcesFixed
        } else {
            DrawMode::ReferenceFixed
        };

        ViewConfig {
            draw_mode,
            animation: RealTime::from_millis(self.animation_ms.max(0)),
            ..ViewConfig::default()
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["ssr-remote"]).unwrap();
        assert_eq!(args.address, "localhost:4711");
        assert_eq!(args.tick_ms, 40);

        let config = args.view_config();
        assert_eq!(config.draw_mode, DrawMode::ReferenceFixed);
        assert_eq!(config.animation, RealTime::from_millis(800));
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "ssr-remote",
            "10.0.0.2:4711",
            "--sources-fixed",
            "--width",
            "320",
            "--animation-ms",
            "250",
        ])
        .unwrap();

        assert_eq!(args.address, "10.0.0.2:4711");
        assert_eq!(args.size(), Vec2::new(320.0, 800.0));

        let config = args.view_config();
        assert_eq!(config.draw_mode, DrawMode::SourcesFixed);
        assert_eq!(config.animation, RealTime::from_millis(250));
    }
}
