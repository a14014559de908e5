use std::fmt::Debug;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

/// How many requests may wait in an actor's queue before senders are suspended.
const QUEUE_DEPTH: usize = 16;

type ResponseReceiver<R, E> = oneshot::Receiver<Result<R, E>>;

/// A single message for an actor, together with the channel its answer
/// travels back on.
pub struct Request<P, R, E> {
    pub payload: P,
    pub response_sender: oneshot::Sender<Result<R, E>>,
}

impl<P, R, E> Request<P, R, E> {
    /// Wrap `payload` into a request and hand back the receiving end of its
    /// response channel.
    pub fn new(payload: P) -> (Request<P, R, E>, ResponseReceiver<R, E>) {
        let (response_sender, response_receiver) = oneshot::channel();
        (
            Request {
                payload,
                response_sender,
            },
            response_receiver,
        )
    }

    /// Answer the request. Fails (returning the response) if the requester
    /// stopped waiting.
    pub fn respond(self, response: Result<R, E>) -> Result<(), Result<R, E>> {
        self.response_sender.send(response)
    }
}

/// Failure of a round trip through an [ActorPort].
#[derive(Debug, Error, Clone)]
pub enum ActorRequestError<E: Debug> {
    #[error("actor is not accepting requests anymore")]
    Send,

    #[error("actor dropped the request without answering")]
    Recv,

    #[error("actor failed to handle the request: {0:?}")]
    Actor(E),
}

/// The sending side of an actor's mailbox.
///
/// Ports are cheap to clone. The actor treats the moment its last port goes
/// away as the signal to clean up and stop, so there is no dedicated stop
/// message.
#[derive(Debug)]
pub struct ActorPort<P, R, E: Debug> {
    message_sender: mpsc::Sender<Request<P, R, E>>,
    shutdown_receiver: watch::Receiver<()>,
}

// A derived Clone would require E: Clone, which anyhow::Error is not.
impl<P, R, E: Debug> Clone for ActorPort<P, R, E> {
    fn clone(&self) -> Self {
        Self {
            message_sender: self.message_sender.clone(),
            shutdown_receiver: self.shutdown_receiver.clone(),
        }
    }
}

impl<P, R, E: Debug> ActorPort<P, R, E> {
    /// Create a connected port / receiver pair. The receiver is meant to be
    /// moved into the actor's task.
    pub fn make() -> (ActorPort<P, R, E>, ActorReceiver<P, R, E>) {
        let (message_sender, request_receiver) = mpsc::channel(QUEUE_DEPTH);
        let (shutdown_notifier, shutdown_receiver) = watch::channel(());
        (
            ActorPort {
                message_sender,
                shutdown_receiver,
            },
            ActorReceiver {
                request_receiver,
                _shutdown_notifier: shutdown_notifier,
            },
        )
    }

    /// Send `payload` to the actor and wait for its answer.
    pub async fn request(&self, payload: P) -> Result<R, ActorRequestError<E>> {
        let (request, response) = Request::new(payload);
        self.message_sender
            .send(request)
            .await
            .map_err(|_| ActorRequestError::Send)?;
        response
            .await
            .map_err(|_| ActorRequestError::Recv)?
            .map_err(ActorRequestError::Actor)
    }

    /// Give up this port and wait until the actor has finished its teardown.
    ///
    /// Returns once every other clone of the port is gone too and the actor
    /// dropped its [ActorReceiver].
    pub async fn await_shutdown(self) {
        drop(self.message_sender);
        let mut shutdown_receiver = self.shutdown_receiver;
        // Nothing is ever sent on this channel, it only closes.
        while shutdown_receiver.changed().await.is_ok() {}
    }
}

/// The receiving side of an actor's mailbox.
///
/// Dropping it tells every [ActorPort::await_shutdown] caller that the actor
/// is done, so it has to be the last thing the actor lets go of.
#[derive(Debug)]
pub struct ActorReceiver<P, R, E: Debug> {
    pub request_receiver: mpsc::Receiver<Request<P, R, E>>,
    _shutdown_notifier: watch::Sender<()>,
}

impl<P, R, E: Debug> ActorReceiver<P, R, E> {
    /// Next request, or `None` once all ports are dropped.
    pub async fn recv(&mut self) -> Option<Request<P, R, E>> {
        self.request_receiver.recv().await
    }
}
