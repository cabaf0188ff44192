//! Asynchronous timer abstraction bounding how long a session waits for a reply.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait Timer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}
