use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::bus::Transport;
use crate::messages::ReadingMessage;
use crate::registry::RegisteredSensor;
use crate::sensors::Mcp9600;

/// Spawn one polling task per sensor
pub fn spawn_sensor_tasks<T>(
    sensors: Vec<RegisteredSensor<T>>,
    tx: mpsc::Sender<ReadingMessage>,
) -> Vec<JoinHandle<()>>
where
    T: Transport + Send + 'static,
{
    sensors
        .into_iter()
        .map(|s| spawn_sensor_task(s.id, s.sensor, s.period, tx.clone()))
        .collect()
}

/// Poll `sensor` every `period` and publish each frame on `tx`
///
/// Driver calls block, so each read runs on the blocking pool with the
/// driver moved in and handed back. A failed read is logged and the next
/// tick tries again; the task ends when the receiver goes away.
pub fn spawn_sensor_task<T>(
    sensor_id: String,
    sensor: Mcp9600<T>,
    period: Duration,
    tx: mpsc::Sender<ReadingMessage>,
) -> JoinHandle<()>
where
    T: Transport + Send + 'static,
{
    tokio::spawn(async move {
        info!("[{}] Starting sensor task every {:?}", sensor_id, period);

        let mut sensor = sensor;
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sequence_counter = 0u64;

        loop {
            ticker.tick().await;

            let joined = tokio::task::spawn_blocking(move || {
                let result = sensor.read_frame();
                (sensor, result)
            })
            .await;

            let result = match joined {
                Ok((returned, result)) => {
                    sensor = returned;
                    result
                }
                Err(e) => {
                    error!("[{}] Sensor read task failed: {}", sensor_id, e);
                    return;
                }
            };

            match result {
                Ok(frame) => {
                    sequence_counter += 1;
                    let msg = ReadingMessage::new(sensor_id.clone(), sequence_counter, &frame);
                    if tx.send(msg).await.is_err() {
                        debug!("[{}] Reading receiver closed, stopping", sensor_id);
                        return;
                    }
                }
                Err(e) => {
                    warn!("[{}] Sensor read error: {}", sensor_id, e);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::Register;
    use crate::sensors::testing::RegisterFile;

    fn registered(id: &str, regs: RegisterFile) -> RegisteredSensor<RegisterFile> {
        RegisteredSensor {
            id: id.to_string(),
            period: Duration::from_millis(5),
            sensor: Mcp9600::new(regs),
        }
    }

    #[tokio::test]
    async fn publishes_sequenced_readings() {
        let mut regs = RegisterFile::mcp9600();
        regs.set(Register::ThermocoupleTemperature, &[0x01, 0x94]);
        regs.set(Register::ColdJunctionTemperature, &[0x01, 0x6C]);

        let (tx, mut rx) = mpsc::channel(4);
        let handles = spawn_sensor_tasks(vec![registered("tc0", regs)], tx);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.sensor_id, "tc0");
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert_eq!(first.hot_junction, 25.25);
        assert_eq!(first.cold_junction, 22.75);

        for h in handles {
            h.abort();
        }
    }

    #[tokio::test]
    async fn failed_reads_publish_nothing() {
        let mut regs = RegisterFile::mcp9600();
        regs.fail_receive = true;

        let (tx, mut rx) = mpsc::channel(4);
        let handle = spawn_sensor_task("tc1".to_string(), Mcp9600::new(regs), Duration::from_millis(5), tx);

        let waited = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(waited.is_err(), "no reading expected, got {waited:?}");
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn task_stops_when_receiver_drops() {
        let (tx, rx) = mpsc::channel(1);
        let handle = spawn_sensor_task(
            "tc2".to_string(),
            Mcp9600::new(RegisterFile::mcp9600()),
            Duration::from_millis(1),
            tx,
        );
        drop(rx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop")
            .unwrap();
    }
}
