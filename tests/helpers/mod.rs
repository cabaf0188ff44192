/// Test doubles simulating the SLCAN serial line and the timer during integration tests.
use cybergear_slcan::protocol::transport::traits::{serial_line::SerialLine, timer::Timer};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory serial line carrying whole `\r`-terminated lines.
pub struct MockSerialLine {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Vec<u8>>>>,
}

#[allow(dead_code)]
impl MockSerialLine {
    /// Construct a pair of interconnected ends (host ↔ adapter/motor).
    pub fn create_pair() -> (Self, Self) {
        let (host_tx, motor_rx) = mpsc::unbounded_channel();
        let (motor_tx, host_rx) = mpsc::unbounded_channel();

        let host = Self {
            tx: host_tx,
            rx: Arc::new(Mutex::new(host_rx)),
        };

        let motor = Self {
            tx: motor_tx,
            rx: Arc::new(Mutex::new(motor_rx)),
        };

        (host, motor)
    }

    /// Next line written by the other end, as text.
    pub async fn expect_line(&mut self) -> String {
        let mut buffer = [0u8; 64];
        let len = self.read_line(&mut buffer).await.expect("line closed");
        String::from_utf8(buffer[..len].to_vec()).expect("non-ASCII line")
    }

    /// Queue one raw line for the other end.
    pub fn reply(&self, line: &[u8]) {
        self.tx.send(line.to_vec()).expect("line closed");
    }
}

impl SerialLine for MockSerialLine {
    type Error = ();

    async fn write_line<'a>(&'a mut self, line: &'a [u8]) -> Result<(), Self::Error> {
        self.tx.send(line.to_vec()).map_err(|_| ())?;
        Ok(())
    }

    async fn read_line<'a>(&'a mut self, buffer: &'a mut [u8]) -> Result<usize, Self::Error> {
        let mut rx = self.rx.lock().await;
        let line = rx.recv().await.ok_or(())?;
        let len = line.len().min(buffer.len());
        buffer[..len].copy_from_slice(&line[..len]);
        Ok(len)
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive timeouts in tests.
pub struct MockTimer;

impl Timer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[allow(dead_code)]
/// Feedback line of motor 0x7F to host 0x00: mid-scale values, 20.0 degC, run mode.
pub const FEEDBACK_7F: &[u8] = b"T02807F00880008000800000C8\r";

#[allow(dead_code)]
pub fn approx(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}
