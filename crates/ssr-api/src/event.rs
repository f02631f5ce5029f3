/// Signals sent from the network actor to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// The initial scene description has been applied. Sent at most once
    /// per connection.
    Ready,
    /// The server closed the stream in an orderly way.
    Disconnected,
    /// A transport fault ended the connection.
    Error { message: String },
}
