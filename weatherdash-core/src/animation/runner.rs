use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};
use tokio::{
    sync::{oneshot, watch},
    task::{JoinError, JoinHandle},
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

use super::{
    Overlay, ParticleField, Surface, Viewport,
    overlay::{STREAK_COUNT, Streak},
};

/// Owner of a running animation task.
///
/// [`AnimationHandle::stop`] ends the loop and hands the surface back.
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct AnimationHandle<S> {
    task: JoinHandle<S>,
    stop: Option<oneshot::Sender<()>>,
    viewport: watch::Sender<Viewport>,
    overlay: watch::Sender<Overlay>,
}

impl<S> AnimationHandle<S> {
    /// Follow a window/terminal resize. Particle positions are left alone.
    pub fn resize(&self, viewport: Viewport) {
        self.viewport.send_if_modified(|current| {
            let changed = *current != viewport;
            *current = viewport;
            changed
        });
    }

    pub fn set_overlay(&self, overlay: Overlay) {
        self.overlay.send_if_modified(|current| {
            let changed = *current != overlay;
            *current = overlay;
            changed
        });
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub async fn stop(mut self) -> Result<S, JoinError> {
        if let Some(stop) = self.stop.take() {
            // The task may already be gone; joining below reports why.
            let _ = stop.send(());
        }
        (&mut self.task).await
    }
}

impl<S> Drop for AnimationHandle<S> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `field` on `surface`, one frame per `frame_interval`, until stopped.
pub fn spawn_animation<S>(
    field: ParticleField,
    surface: S,
    frame_interval: Duration,
) -> AnimationHandle<S>
where
    S: Surface + Send + 'static,
{
    let (stop_tx, stop_rx) = oneshot::channel();
    let (viewport_tx, viewport_rx) = watch::channel(field.viewport());
    let (overlay_tx, overlay_rx) = watch::channel(Overlay::None);

    let task = tokio::spawn(run_frames(
        field,
        surface,
        frame_interval,
        stop_rx,
        viewport_rx,
        overlay_rx,
    ));

    AnimationHandle {
        task,
        stop: Some(stop_tx),
        viewport: viewport_tx,
        overlay: overlay_tx,
    }
}

async fn run_frames<S: Surface>(
    mut field: ParticleField,
    mut surface: S,
    frame_interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
    mut viewport_rx: watch::Receiver<Viewport>,
    mut overlay_rx: watch::Receiver<Overlay>,
) -> S {
    let mut rng = StdRng::seed_from_u64(rand::random());
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut overlay = Overlay::None;
    let mut streaks: Vec<Streak> = Vec::new();
    let mut overlay_since = Instant::now();
    let mut frames: u64 = 0;

    loop {
        tokio::select! {
            biased;

            _ = &mut stop_rx => break,

            changed = viewport_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let viewport = *viewport_rx.borrow_and_update();
                debug!(width = viewport.width(), height = viewport.height(), "animation resized");
                field.resize(viewport);
            }

            changed = overlay_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                overlay = *overlay_rx.borrow_and_update();
                streaks = overlay.streaks(STREAK_COUNT, &mut rng);
                overlay_since = Instant::now();
            }

            _ = ticker.tick() => {
                field.step();
                field.render(&mut surface);

                let elapsed = overlay_since.elapsed().as_secs_f64();
                for streak in &streaks {
                    if let Some((x, y)) = streak.position(elapsed, field.viewport()) {
                        surface.draw_streak(x, y, overlay);
                    }
                }

                surface.present();
                frames += 1;
            }
        }
    }

    debug!(frames, "animation stopped");
    surface
}
