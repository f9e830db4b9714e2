//! Pull delivery
//!
//! A `PointerWatcher` enqueues a live `PointerHandle` the first time it sees a
//! pointer id; later events only mutate that handle. Consumers drain the
//! handles from a `PointerStream` at their own pace.

use crate::error::{ObserverError, Result};
use crate::input::target::{EventTarget, PointerListener, TargetId};
use crate::input::types::{PointerEventKind, RawPointerEvent};
use crate::observer::core::ObserverCore;
use crate::observer::options::ObserverOptions;
use crate::pointer::registry::PointerHandle;
use crate::pointer::state::PointerState;
use futures::Stream;
use parking_lot::Mutex as ParkingMutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

type Sink = Arc<ParkingMutex<Option<mpsc::UnboundedSender<PointerHandle>>>>;

/// Watches a single target and hands out newly discovered pointers
pub struct PointerWatcher {
    target: TargetId,
    signal: CancellationToken,
    core: Arc<ParkingMutex<ObserverCore>>,
    sink: Sink,
    stream: ParkingMutex<Option<PointerStream>>,
}

impl PointerWatcher {
    /// Attach to `target`; the watcher listens until disposed, dropped or its
    /// stream is cancelled.
    pub fn new<T>(target: &T, options: ObserverOptions) -> Result<Self>
    where
        T: EventTarget + ?Sized,
    {
        let target_id = target.target_id();
        let core = Arc::new(ParkingMutex::new(ObserverCore::new(target_id, options)?));
        let signal = CancellationToken::new();
        let (sender, receiver) = mpsc::unbounded_channel();
        let sink: Sink = Arc::new(ParkingMutex::new(Some(sender)));

        let listener = Self::listener(target_id, core.clone(), sink.clone(), signal.clone());
        for kind in PointerEventKind::OBSERVED {
            target.add_listener(kind, listener.clone(), signal.clone());
        }

        tracing::info!(target_id = %target_id, "Watching pointer events");

        Ok(Self {
            target: target_id,
            signal: signal.clone(),
            core,
            sink,
            stream: ParkingMutex::new(Some(PointerStream { receiver, signal })),
        })
    }

    fn listener(
        target_id: TargetId,
        core: Arc<ParkingMutex<ObserverCore>>,
        sink: Sink,
        signal: CancellationToken,
    ) -> PointerListener {
        Arc::new(move |event: &RawPointerEvent| {
            if signal.is_cancelled() {
                return;
            }

            let discovered = {
                let mut core = core.lock();
                let Some(processed) = core.process(event) else {
                    return;
                };
                if processed.left {
                    core.evict(processed.pointer_id);
                }
                processed.created.then_some(processed.handle)
            };

            let Some(handle) = discovered else {
                return;
            };
            if signal.is_cancelled() {
                return;
            }

            let pointer_id = handle.id();
            match sink.lock().as_ref() {
                Some(sender) => {
                    if let Err(e) = sender.send(handle) {
                        tracing::warn!(
                            target_id = %target_id,
                            pointer_id,
                            "Pointer stream closed, dropping handle: {}",
                            e
                        );
                    }
                }
                None => {
                    tracing::warn!(target_id = %target_id, pointer_id, "Pointer stream disposed");
                }
            }
        })
    }

    pub fn target_id(&self) -> TargetId {
        self.target
    }

    /// Take the consumer side. Only one stream exists per watcher.
    pub fn take_stream(&self) -> Result<PointerStream> {
        self.stream.lock().take().ok_or(ObserverError::StreamAlreadyTaken)
    }

    /// Current pointers, most recently active first
    pub fn snapshot(&self) -> Vec<PointerState> {
        self.core.lock().snapshot()
    }

    pub fn is_disposed(&self) -> bool {
        self.signal.is_cancelled()
    }

    /// Stop listening, close the stream and forget all pointers
    pub fn dispose(&self) {
        if self.signal.is_cancelled() {
            return;
        }
        self.signal.cancel();
        self.sink.lock().take();
        self.stream.lock().take();
        self.core.lock().clear();
        tracing::info!(target_id = %self.target, "Disposed pointer watcher");
    }
}

impl Drop for PointerWatcher {
    fn drop(&mut self) {
        self.signal.cancel();
        self.sink.lock().take();
    }
}

/// Consumer side of a `PointerWatcher`
pub struct PointerStream {
    receiver: mpsc::UnboundedReceiver<PointerHandle>,
    signal: CancellationToken,
}

impl PointerStream {
    /// Wait for the next newly discovered pointer.
    ///
    /// Returns `None` once the watcher was disposed or the stream cancelled;
    /// handles still buffered at that point are discarded.
    pub async fn recv(&mut self) -> Option<PointerHandle> {
        if self.signal.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.signal.cancelled() => None,
            handle = self.receiver.recv() => handle,
        }
    }

    /// Next buffered pointer, without waiting
    pub fn try_recv(&mut self) -> Option<PointerHandle> {
        if self.signal.is_cancelled() {
            return None;
        }
        self.receiver.try_recv().ok()
    }

    /// Stop the watcher from listening and close this stream
    pub fn cancel(&mut self) {
        self.signal.cancel();
        self.receiver.close();
    }
}

impl Stream for PointerStream {
    type Item = PointerHandle;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.signal.is_cancelled() {
            return Poll::Ready(None);
        }
        self.receiver.poll_recv(cx)
    }
}
