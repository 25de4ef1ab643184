//! Streaming recognition: two tasks joined by bounded queues.
//!
//! ```text
//!  push(wave) ──▶ [waves: mpsc<Wave>] ──▶ send task ──▶ StreamSink
//!                                                        (server)
//!  next_result() ◀── [results: mpsc<Result>] ◀── recv task ◀── StreamSource
//! ```
//!
//! The transport is split into a [`StreamSink`] and a [`StreamSource`] so
//! each task owns its half outright.  Shutdown is driven by two explicit
//! one-shot signals:
//!
//! * **half-close**: the send task stops accepting waves, flushes what is
//!   already queued and calls [`StreamSink::close_send`].  The server keeps
//!   answering.
//! * **drain**: the receive task stops reading from the source and exits.
//!   Results already queued are still handed back.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::api::{ApiResponse, ApiStatus, RecognitionResult, SpeechRequest};
use crate::recognizer::engine::RecognizerError;
use crate::wave::Wave;

type StreamItem = Result<ApiResponse, RecognizerError>;

// ---------------------------------------------------------------------------
// Transport halves
// ---------------------------------------------------------------------------

/// Outgoing half of a bidirectional recognition stream.
#[async_trait]
pub trait StreamSink: Send + 'static {
    async fn send(&mut self, request: SpeechRequest) -> Result<(), RecognizerError>;

    /// Tell the server no more audio follows.
    async fn close_send(&mut self) -> Result<(), RecognizerError>;
}

/// Incoming half of a bidirectional recognition stream.
#[async_trait]
pub trait StreamSource: Send + 'static {
    /// Next response, or `Ok(None)` once the server has finished.
    async fn recv(&mut self) -> Result<Option<ApiResponse>, RecognizerError>;
}

// ---------------------------------------------------------------------------
// StreamRecognition
// ---------------------------------------------------------------------------

/// Handle to a running streaming-recognition session.
///
/// Dropping the handle without calling [`finish`](Self::finish) or
/// [`drain`](Self::drain) still shuts both tasks down: the dropped signals
/// count as half-close and drain.
pub struct StreamRecognition {
    waves: Option<mpsc::Sender<Wave>>,
    results: mpsc::Receiver<StreamItem>,
    half_close: Option<oneshot::Sender<()>>,
    drain: Option<oneshot::Sender<()>>,
    send_task: Option<JoinHandle<Result<usize, RecognizerError>>>,
    recv_task: Option<JoinHandle<()>>,
}

impl StreamRecognition {
    /// Spawn the send and receive tasks.  Must be called inside a tokio
    /// runtime.  `capacity` bounds both queues (minimum 1).
    pub fn start<S, R>(sink: S, source: R, capacity: usize) -> Self
    where
        S: StreamSink,
        R: StreamSource,
    {
        let capacity = capacity.max(1);
        let (wave_tx, wave_rx) = mpsc::channel(capacity);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        let (half_close_tx, half_close_rx) = oneshot::channel();
        let (drain_tx, drain_rx) = oneshot::channel();

        let send_task = tokio::spawn(send_loop(sink, wave_rx, half_close_rx));
        let recv_task = tokio::spawn(recv_loop(source, result_tx, drain_rx));

        log::debug!("stream: session started (capacity {capacity})");

        Self {
            waves: Some(wave_tx),
            results: result_rx,
            half_close: Some(half_close_tx),
            drain: Some(drain_tx),
            send_task: Some(send_task),
            recv_task: Some(recv_task),
        }
    }

    /// Queue a wave for sending, waiting while the queue is full.
    pub async fn push(&self, wave: Wave) -> Result<(), RecognizerError> {
        let tx = self
            .waves
            .as_ref()
            .ok_or_else(|| RecognizerError::Stream("stream is half-closed".into()))?;
        tx.send(wave)
            .await
            .map_err(|_| RecognizerError::Stream("send task has stopped".into()))
    }

    /// A producer handle for feeding waves from another task.
    ///
    /// Returns `None` after [`half_close`](Self::half_close).
    pub fn wave_sender(&self) -> Option<mpsc::Sender<Wave>> {
        self.waves.clone()
    }

    /// Next result from the server, or `None` once the receive side ended.
    pub async fn next_result(&mut self) -> Option<StreamItem> {
        self.results.recv().await
    }

    /// Stop sending: flush queued waves, close the outgoing half and return
    /// how many waves were sent in total.  Calling it twice is an error.
    ///
    /// This waits for the send task only.  With a flow-controlled transport,
    /// keep reading [`next_result`](Self::next_result) from another task or
    /// use [`finish`](Self::finish).
    pub async fn half_close(&mut self) -> Result<usize, RecognizerError> {
        let task = self
            .send_task
            .take()
            .ok_or_else(|| RecognizerError::Stream("stream already half-closed".into()))?;
        self.waves = None;
        if let Some(signal) = self.half_close.take() {
            let _ = signal.send(());
        }
        let sent = task
            .await
            .map_err(|e| RecognizerError::Stream(e.to_string()))??;
        log::debug!("stream: half-closed after {sent} wave(s)");
        Ok(sent)
    }

    /// Half-close (if not already done) and collect every remaining result
    /// until the server ends the stream.  The first error is returned.
    ///
    /// Results are read while the queued waves are still being flushed, so
    /// a transport that stops accepting requests until its responses are
    /// consumed cannot stall the session.
    pub async fn finish(mut self) -> Result<Vec<ApiResponse>, RecognizerError> {
        self.waves = None;
        if let Some(signal) = self.half_close.take() {
            let _ = signal.send(());
        }
        let send_task = self.send_task.take();

        let results = &mut self.results;
        let collect = async {
            let mut collected = Vec::new();
            while let Some(item) = results.recv().await {
                collected.push(item?);
            }
            Ok::<_, RecognizerError>(collected)
        };
        let flush = async {
            let sent = match send_task {
                Some(task) => task
                    .await
                    .map_err(|e| RecognizerError::Stream(e.to_string()))??,
                None => 0,
            };
            log::debug!("stream: half-closed after {sent} wave(s)");
            Ok::<_, RecognizerError>(sent)
        };

        let (collected, _) = tokio::try_join!(collect, flush)?;
        self.join_recv().await?;
        Ok(collected)
    }

    /// Stop receiving without waiting for the server.  Returns the results
    /// that were already queued.  Sending is not affected until the handle
    /// is dropped.
    pub async fn drain(mut self) -> Result<Vec<ApiResponse>, RecognizerError> {
        if let Some(signal) = self.drain.take() {
            let _ = signal.send(());
        }
        self.results.close();
        let mut collected = Vec::new();
        while let Some(item) = self.results.recv().await {
            match item {
                Ok(response) => collected.push(response),
                Err(e) => log::warn!("stream: dropping error while draining: {e}"),
            }
        }
        self.join_recv().await?;
        log::debug!("stream: drained {} result(s)", collected.len());
        Ok(collected)
    }

    async fn join_recv(&mut self) -> Result<(), RecognizerError> {
        match self.recv_task.take() {
            Some(task) => task.await.map_err(|e| RecognizerError::Stream(e.to_string())),
            None => Ok(()),
        }
    }
}

async fn send_loop<S: StreamSink>(
    mut sink: S,
    mut waves: mpsc::Receiver<Wave>,
    mut half_close: oneshot::Receiver<()>,
) -> Result<usize, RecognizerError> {
    let mut sent = 0usize;
    loop {
        tokio::select! {
            biased;
            _ = &mut half_close => {
                // Refuse new waves but flush the ones already queued.
                waves.close();
                while let Some(wave) = waves.recv().await {
                    sink.send(SpeechRequest::from_wave(&wave)).await?;
                    sent += 1;
                }
                break;
            }
            next = waves.recv() => match next {
                Some(wave) => {
                    sink.send(SpeechRequest::from_wave(&wave)).await?;
                    sent += 1;
                }
                None => break,
            },
        }
    }
    sink.close_send().await?;
    Ok(sent)
}

async fn recv_loop<R: StreamSource>(
    mut source: R,
    results: mpsc::Sender<StreamItem>,
    mut drain: oneshot::Receiver<()>,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = &mut drain => break,
            next = source.recv() => next,
        };
        match next {
            Ok(Some(response)) => {
                if results.send(Ok(response)).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::warn!("stream: receive failed: {e}");
                let _ = results.send(Err(e)).await;
                break;
            }
        }
    }
    log::debug!("stream: receive task finished");
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Running transcript built from streaming results.
///
/// Final results (status 200000) are appended to the committed text and
/// clear the pending fragment; partial results (206000) replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    committed: String,
    pending: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, response: &ApiResponse) {
        match (&response.result, response.status()) {
            (RecognitionResult::Partial(text), _) => self.pending = text.clone(),
            (RecognitionResult::Text(text), ApiStatus::Ok) => {
                self.committed.push_str(text);
                self.pending.clear();
            }
            _ => {}
        }
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Committed text followed by the pending fragment.
    pub fn text(&self) -> String {
        format!("{}{}", self.committed, self.pending)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
