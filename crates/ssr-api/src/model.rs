use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransportState {
    Playing,
    #[default]
    Paused,
}

impl TransportState {
    pub fn from_protocol(value: &str) -> Option<TransportState> {
        match value.trim() {
            "start" => Some(TransportState::Playing),
            "stop" => Some(TransportState::Paused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCommand {
    Start,
    Stop,
    Rewind,
}

impl TransportCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportCommand::Start => "start",
            TransportCommand::Stop => "stop",
            TransportCommand::Rewind => "rewind",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SourceModel {
    #[default]
    Point,
    Plane,
}

impl FromStr for SourceModel {
    type Err = ();

    fn from_str(s: &str) -> Result<SourceModel, ()> {
        if s.eq_ignore_ascii_case("point") {
            Ok(SourceModel::Point)
        } else if s.eq_ignore_ascii_case("plane") {
            Ok(SourceModel::Plane)
        } else {
            Err(())
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpeakerModel {
    #[default]
    Normal,
    Subwoofer,
}

impl FromStr for SpeakerModel {
    type Err = ();

    fn from_str(s: &str) -> Result<SpeakerModel, ()> {
        if s.eq_ignore_ascii_case("normal") {
            Ok(SpeakerModel::Normal)
        } else if s.eq_ignore_ascii_case("subwoofer") {
            Ok(SpeakerModel::Subwoofer)
        } else {
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_protocol_values() {
        assert_eq!(
            TransportState::from_protocol("start"),
            Some(TransportState::Playing)
        );
        assert_eq!(
            TransportState::from_protocol(" stop\n"),
            Some(TransportState::Paused)
        );
        assert_eq!(TransportState::from_protocol("rewind"), None);

        assert_eq!("PLANE".parse(), Ok(SourceModel::Plane));
        assert_eq!("point".parse(), Ok(SourceModel::Point));
        assert_eq!("line".parse::<SourceModel>(), Err(()));
        assert_eq!("subwoofer".parse(), Ok(SpeakerModel::Subwoofer));
    }
}
