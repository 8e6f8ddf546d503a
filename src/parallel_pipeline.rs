// THEORY:
// Scans at different offsets share nothing but read-only references to the
// same grid and target, so a sweep splits cleanly across workers.
//
// Layout:
// 1.  **Dispatcher**: one task receives `SweepTask`s and hands them to workers
//     round-robin.
// 2.  **Workers**: each owns a receiver and runs the scans for one band of rows
//     at a time, replying on the task's `oneshot` channel.
// 3.  **Reassembly**: `ParallelSweep` cuts the vertical offsets into contiguous
//     bands, submits one task per band and awaits all replies in band order.
//     Concatenating the bands restores row-major order, so the report equals
//     the one `SweepPipeline` would build.

use crate::core_modules::scan::{Confidence, Scan};
use crate::core_modules::snapper_image::SnapperImage;
use crate::core_modules::target_shape::{TargetImage, TargetShape};
use crate::error::{Result, SnapperError};
use crate::pipeline::{PipelineConfig, SweepReport, assemble_report, candidate_offsets};
use futures::future::join_all;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// A band of vertical offsets to scan at every horizontal offset.
pub struct SweepTask {
    pub image: Arc<SnapperImage>,
    pub target: Arc<TargetShape>,
    pub rows: RangeInclusive<usize>,
    pub max_horizontal: usize,
    pub minimum_confidence: Confidence,
    pub result_sender: oneshot::Sender<Result<Vec<Scan>>>,
}

pub struct WorkerPool {
    task_sender: mpsc::UnboundedSender<SweepTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `worker_count` workers and a dispatcher. Must be called from
    /// within a tokio runtime.
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<SweepTask>();
        let mut workers = Vec::with_capacity(worker_count);

        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<SweepTask>())
            .unzip();

        tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                let _ = worker_senders[worker_idx].send(task);
                worker_idx = (worker_idx + 1) % worker_count;
            }
        });

        for mut worker_receiver in worker_receivers {
            let worker = tokio::spawn(async move {
                while let Some(task) = worker_receiver.recv().await {
                    let scans = Self::process_band(&task);
                    let _ = task.result_sender.send(scans);
                }
            });
            workers.push(worker);
        }

        Self {
            task_sender,
            workers,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn process_band(task: &SweepTask) -> Result<Vec<Scan>> {
        let mut scans = Vec::new();
        for v in task.rows.clone() {
            for h in 0..=task.max_horizontal {
                scans.push(Scan::new(
                    &task.image.grid,
                    task.target.as_ref(),
                    h,
                    v,
                    task.minimum_confidence,
                )?);
            }
        }
        Ok(scans)
    }

    pub async fn submit(
        &self,
        image: Arc<SnapperImage>,
        target: Arc<TargetShape>,
        rows: RangeInclusive<usize>,
        max_horizontal: usize,
        minimum_confidence: Confidence,
    ) -> Result<Vec<Scan>> {
        let (result_sender, result_receiver) = oneshot::channel();

        let task = SweepTask {
            image,
            target,
            rows,
            max_horizontal,
            minimum_confidence,
            result_sender,
        };

        self.task_sender
            .send(task)
            .map_err(|_| SnapperError::WorkerPool("failed to send task to worker pool"))?;

        result_receiver
            .await
            .map_err(|_| SnapperError::WorkerPool("failed to receive result from worker"))?
    }

    /// Closes the task channel and waits for every worker to drain.
    pub async fn shutdown(self) {
        drop(self.task_sender);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

/// The concurrent sweep driver.
pub struct ParallelSweep {
    config: PipelineConfig,
    worker_pool: WorkerPool,
}

impl ParallelSweep {
    /// `workers` defaults to the number of logical CPUs.
    pub fn new(config: PipelineConfig, workers: Option<usize>) -> Result<Self> {
        config.validate()?;
        let worker_count = workers.unwrap_or_else(num_cpus::get).max(1);
        Ok(Self {
            config,
            worker_pool: WorkerPool::new(worker_count),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_pool.worker_count()
    }

    pub async fn sweep(
        &self,
        image: Arc<SnapperImage>,
        target: Arc<TargetShape>,
    ) -> Result<SweepReport> {
        let offsets = candidate_offsets(image.as_ref(), target.as_ref());
        let Some(&(max_horizontal, max_vertical)) = offsets.last() else {
            return Ok(assemble_report(&self.config, &image, target.name(), &[]));
        };

        let band_count = self.worker_count().min(max_vertical + 1);
        let band_height = (max_vertical + 1).div_ceil(band_count);
        debug!(
            target_name = target.name(),
            bands = band_count,
            band_height,
            "dispatching sweep"
        );

        let pending = (0..=max_vertical).step_by(band_height).map(|start| {
            let end = (start + band_height - 1).min(max_vertical);
            self.worker_pool.submit(
                Arc::clone(&image),
                Arc::clone(&target),
                start..=end,
                max_horizontal,
                self.config.minimum_confidence,
            )
        });

        let mut scans = Vec::with_capacity(offsets.len());
        for band in join_all(pending).await {
            scans.extend(band?);
        }

        Ok(assemble_report(&self.config, &image, target.name(), &scans))
    }

    pub async fn shutdown(self) {
        self.worker_pool.shutdown().await;
    }
}
