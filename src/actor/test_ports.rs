use super::ports::{ActorPort, ActorRequestError, Request};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

enum AccumulatorMessage {
    Add(u32),
    // Actors must always answer; this one exists only to exercise error paths.
    Vanish,
}

/// Spawns an actor summing up numbers which refuses to go above `limit`.
fn spawn_accumulator(
    limit: u32,
    stopped: Arc<AtomicBool>,
) -> ActorPort<AccumulatorMessage, u32, String> {
    let (port, mut receiver) = ActorPort::make();
    tokio::spawn(async move {
        let mut sum = 0;
        while let Some(req) = receiver.recv().await {
            match req.payload {
                AccumulatorMessage::Add(n) if sum + n > limit => {
                    req.respond(Err(format!("{} would exceed {}", sum + n, limit)))
                        .expect("Couldn't respond to request");
                }
                AccumulatorMessage::Add(n) => {
                    sum += n;
                    req.respond(Ok(sum)).expect("Couldn't respond to request");
                }
                AccumulatorMessage::Vanish => return,
            }
        }
        stopped.store(true, Ordering::Release);
    });
    port
}

#[tokio::test]
async fn test_request_response() {
    let (request, receiver) = Request::<u8, bool, ()>::new(7);
    assert_eq!(request.payload, 7);
    request.respond(Ok(true)).expect("Response channel closed");
    assert_eq!(receiver.await.expect("Response lost"), Ok(true));
}

#[tokio::test]
async fn test_round_trips_and_actor_errors() {
    let stopped = Arc::new(AtomicBool::new(false));
    let port = spawn_accumulator(10, stopped.clone());
    assert_eq!(port.request(AccumulatorMessage::Add(4)).await.unwrap(), 4);
    assert_eq!(port.clone().request(AccumulatorMessage::Add(6)).await.unwrap(), 10);
    match port.request(AccumulatorMessage::Add(1)).await {
        Err(ActorRequestError::Actor(message)) => assert_eq!(message, "11 would exceed 10"),
        other => panic!("Unexpected result {:?}", other),
    }
    assert!(!stopped.load(Ordering::Acquire));
    port.await_shutdown().await;
    assert!(stopped.load(Ordering::Acquire));
}

#[tokio::test]
async fn test_dead_actor() {
    let port = spawn_accumulator(10, Arc::new(AtomicBool::new(false)));
    assert!(matches!(
        port.request(AccumulatorMessage::Vanish).await,
        Err(ActorRequestError::Recv)
    ));
    assert!(matches!(
        port.request(AccumulatorMessage::Add(1)).await,
        Err(ActorRequestError::Send)
    ));
    // Must not hang once the receiver is gone
    port.await_shutdown().await;
}
