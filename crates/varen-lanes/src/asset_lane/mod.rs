// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The asset lane: parallel texture decode behind a join barrier.
//!
//! Scene loads decode many independent image payloads; that work fans out to
//! a fixed pool of worker threads and joins before the scene is handed to
//! the simulation, so nothing downstream ever observes a half-decoded set.

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;

/// A decoded RGBA8 image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixel data.
    pub rgba: Vec<u8>,
}

/// A fixed-size pool decoding image payloads in parallel.
#[derive(Debug, Clone)]
pub struct DecodePool {
    workers: usize,
}

impl DecodePool {
    /// Creates a pool with the given worker count (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Decodes every payload, returning results in input order. The call
    /// blocks until all workers are done; a payload that fails to decode
    /// yields an error in its slot without affecting the others.
    pub fn decode_all(&self, payloads: &[Vec<u8>]) -> Vec<Result<DecodedImage>> {
        let (job_tx, job_rx) = unbounded::<(usize, &[u8])>();
        let (result_tx, result_rx) = unbounded();
        for (index, payload) in payloads.iter().enumerate() {
            job_tx
                .send((index, payload.as_slice()))
                .expect("job receiver alive until the scope ends");
        }
        drop(job_tx);

        let mut results: Vec<Option<Result<DecodedImage>>> =
            (0..payloads.len()).map(|_| None).collect();
        std::thread::scope(|scope| {
            for _ in 0..self.workers.min(payloads.len().max(1)) {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    while let Ok((index, bytes)) = job_rx.recv() {
                        let _ = result_tx.send((index, decode_rgba(bytes)));
                    }
                });
            }
            drop(result_tx);
            // The join barrier: the result channel closes only once every
            // worker has drained its jobs and exited.
            while let Ok((index, result)) = result_rx.recv() {
                results[index] = Some(result);
            }
        });

        results
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Err(anyhow::anyhow!("decode worker lost a job"))))
            .collect()
    }
}

fn decode_rgba(bytes: &[u8]) -> Result<DecodedImage> {
    let image = image::load_from_memory(bytes).context("failed to decode image payload")?;
    let rgba = image.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
