use std::thread;
use std::time::Duration;

use log::info;
use othello_session::{Session, SessionConfig, SessionState};

// One host tick, roughly a 60 Hz frame
const TICK: Duration = Duration::from_millis(16);

/// Headless host loop: the "human" always plays its first legal move while the
/// AI searches in the background, until neither side can move.
fn main() {
    env_logger::init();

    let mut session = Session::new(SessionConfig::default());
    info!("new game: human plays {}, AI plays {}", session.human(), session.ai());

    loop {
        match session.state() {
            SessionState::AwaitingHumanMove => {
                let Some(&mv) = session.legal_moves().first() else {
                    break;
                };
                if let Err(err) = session.submit_human_move(mv) {
                    log::error!("human move {} rejected: {}", mv, err);
                    break;
                }
            }
            SessionState::AiSearchInFlight => {
                if session.poll_search().is_none() {
                    if let Some(remaining) = session.time_remaining() {
                        log::trace!("AI thinking, {:.1}s left", remaining.as_secs_f32());
                    }
                    thread::sleep(TICK);
                }
            }
            SessionState::GameOver => break,
        }
    }

    let (black, white) = session.score();
    match session.outcome() {
        Some(outcome) => info!("{} ({} - {})", outcome, black, white),
        None => info!("stopped early at {} - {}", black, white),
    }
    print!("{}", session.board());
}
