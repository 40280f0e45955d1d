//! Speaker ordering by trading positions with a neighbour.

use client_core::{ClientError, ConferenceBackend};
use futures::future::join_all;
use shared::{
    domain::{Speaker, SpeakerId},
    protocol::PositionUpdate,
};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Which move controls are enabled for the speaker at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveAvailability {
    pub up: bool,
    pub down: bool,
}

pub fn availability(index: usize, len: usize) -> MoveAvailability {
    MoveAvailability {
        up: index > 0 && index < len,
        down: index + 1 < len,
    }
}

/// Moves `current` one slot up; the speaker above takes its old position.
pub fn move_up(current: &Speaker, previous: &Speaker) -> [PositionUpdate; 2] {
    shift(current, current.position - 1, previous)
}

/// Moves `current` one slot down; the speaker below takes its old position.
pub fn move_down(current: &Speaker, next: &Speaker) -> [PositionUpdate; 2] {
    shift(current, current.position + 1, next)
}

fn shift(current: &Speaker, target: i64, neighbour: &Speaker) -> [PositionUpdate; 2] {
    [
        PositionUpdate {
            id: current.id.clone(),
            position: target,
        },
        PositionUpdate {
            id: neighbour.id.clone(),
            position: current.position,
        },
    ]
}

/// Orders speakers by position; ties keep their incoming order.
pub fn sort_by_position(speakers: &mut [Speaker]) {
    speakers.sort_by_key(|speaker| speaker.position);
}

/// Updates for moving `id` within a list already sorted by position, or `None`
/// when the speaker is missing or already at that end.
pub fn plan_move(
    speakers: &[Speaker],
    id: &SpeakerId,
    direction: Direction,
) -> Option<[PositionUpdate; 2]> {
    let index = speakers.iter().position(|speaker| &speaker.id == id)?;
    let allowed = availability(index, speakers.len());
    match direction {
        Direction::Up if allowed.up => Some(move_up(&speakers[index], &speakers[index - 1])),
        Direction::Down if allowed.down => Some(move_down(&speakers[index], &speakers[index + 1])),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct ReorderReport {
    pub applied: Vec<SpeakerId>,
    pub failed: Vec<(SpeakerId, ClientError)>,
}

impl ReorderReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sends both updates concurrently. Updates are independent; a failure of one
/// does not roll back the other.
pub async fn apply_position_updates<B>(backend: &B, updates: [PositionUpdate; 2]) -> ReorderReport
where
    B: ConferenceBackend + ?Sized,
{
    let results = join_all(updates.iter().map(|update| backend.update_speaker_position(update))).await;

    let mut report = ReorderReport::default();
    for (update, result) in updates.into_iter().zip(results) {
        match result {
            Ok(()) => report.applied.push(update.id),
            Err(err) => report.failed.push((update.id, err)),
        }
    }

    if report.is_complete() {
        info!(speakers = ?report.applied, "speaker positions swapped");
    } else {
        warn!(
            applied = ?report.applied,
            failed = ?report.failed.iter().map(|(id, err)| format!("{id}: {err}")).collect::<Vec<_>>(),
            "speaker reorder partially failed"
        );
    }
    report
}

#[cfg(test)]
#[path = "tests/reorder_tests.rs"]
mod tests;
