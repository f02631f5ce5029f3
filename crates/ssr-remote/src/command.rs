use std::str::FromStr;

use glam::Vec2;
use ssr_view::Orientation;

/// A line typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Rewind,
    /// Scene volume in dB.
    Volume(f32),
    /// Head azimuth in degrees.
    Head(f32),
    ZoomIn,
    ZoomOut,
    Fit,
    Orientation(Orientation),
    Tap(Vec2),
    DoubleTap(Vec2),
    Drag { from: Vec2, to: Vec2 },
    Fling(Vec2),
    Show,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` expects {expected} numeric arguments")]
    Arguments {
        command: &'static str,
        expected: usize,
    },
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Command, ParseError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ParseError::Empty)?;
        let rest: Vec<&str> = words.collect();

        let command = match name {
            "play" => Command::Play,
            "pause" | "stop" => Command::Pause,
            "rewind" => Command::Rewind,
            "volume" => {
                let [db] = numbers::<1>("volume", &rest)?;
                Command::Volume(db)
            }
            "head" => {
                let [azimuth] = numbers::<1>("head", &rest)?;
                Command::Head(azimuth)
            }
            "+" | "zoom-in" => Command::ZoomIn,
            "-" | "zoom-out" => Command::ZoomOut,
            "fit" => Command::Fit,
            "portrait" => Command::Orientation(Orientation::Portrait),
            "landscape" => Command::Orientation(Orientation::Landscape),
            "tap" => {
                let [x, y] = numbers::<2>("tap", &rest)?;
                Command::Tap(Vec2::new(x, y))
            }
            "double" => {
                let [x, y] = numbers::<2>("double", &rest)?;
                Command::DoubleTap(Vec2::new(x, y))
            }
            "drag" => {
                let [x0, y0, x1, y1] = numbers::<4>("drag", &rest)?;
                Command::Drag {
                    from: Vec2::new(x0, y0),
                    to: Vec2::new(x1, y1),
                }
            }
            "fling" => {
                let [x, y] = numbers::<2>("fling", &rest)?;
                Command::Fling(Vec2::new(x, y))
            }
            "show" | "ls" => Command::Show,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_owned())),
        };

        Ok(command)
    }
}

fn numbers<const N: usize>(command: &'static str, words: &[&str]) -> Result<[f32; N], ParseError> {
    let error = || ParseError::Arguments {
        command,
        expected: N,
    };

    if words.len() != N {
        return Err(error());
    }

    let mut values = [0.0; N];
    for (value, word) in values.iter_mut().zip(words) {
        *value = word.parse::<f32>().ok().filter(|v| v.is_finite()).ok_or_else(error)?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("play".parse(), Ok(Command::Play));
        assert_eq!("  volume -6.5 ".parse(), Ok(Command::Volume(-6.5)));
        assert_eq!("landscape".parse(), Ok(Command::Orientation(Orientation::Landscape)));
        assert_eq!(
            "drag 1 2 3 4".parse(),
            Ok(Command::Drag {
                from: Vec2::new(1.0, 2.0),
                to: Vec2::new(3.0, 4.0),
            })
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(ParseError::Unknown("dance".into()))
        );
        assert_eq!(
            "tap 1".parse::<Command>(),
            Err(ParseError::Arguments {
                command: "tap",
                expected: 2
            })
        );
        assert!("volume loud".parse::<Command>().is_err());
        assert!("head NaN".parse::<Command>().is_err());
    }
}
