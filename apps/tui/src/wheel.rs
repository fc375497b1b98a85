//! The selection wheel: a spin state machine over the current candidates.
//!
//! Selection is uniform over candidates. The rotation only decides what the
//! animation shows, and it is computed so the chosen slice always comes to
//! rest under the pointer at the top of the wheel.

use rand::Rng;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Full turns added to every spin so the wheel always visibly moves forward.
pub const EXTRA_TURNS: f64 = 10.0;
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(5200);

/// Slice colours, assigned round-robin.
pub const PALETTE: [SliceColor; 4] = [
    SliceColor(0xfb, 0xc2, 0xeb),
    SliceColor(0xa6, 0xc1, 0xee),
    SliceColor(0xfd, 0xcb, 0xf1),
    SliceColor(0xf3, 0xe5, 0xf5),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceColor(pub u8, pub u8, pub u8);

/// One candidate's share of the wheel face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub index: usize,
    pub start_percent: f64,
    pub end_percent: f64,
    pub color: SliceColor,
}

impl Slice {
    /// Angular span in degrees, clockwise from the pointer.
    pub fn degrees(&self) -> (f64, f64) {
        (self.start_percent * 3.6, self.end_percent * 3.6)
    }
}

/// Splits the wheel into `count` equal slices covering the whole circle.
pub fn partition(count: usize) -> Vec<Slice> {
    if count == 0 {
        return Vec::new();
    }

    let percent_at = |i: usize| (i * 100) as f64 / count as f64;
    (0..count)
        .map(|index| Slice {
            index,
            start_percent: percent_at(index),
            end_percent: percent_at(index + 1),
            color: PALETTE[index % PALETTE.len()],
        })
        .collect()
}

/// Rotation to add to `current` so the centre of slice `index` stops under the pointer.
pub fn landing_rotation(current: f64, index: usize, count: usize) -> f64 {
    let angle_per_slice = 360.0 / count as f64;
    let slice_centre = (index as f64).mul_add(angle_per_slice, angle_per_slice / 2.0);
    let target = (360.0 - slice_centre).rem_euclid(360.0);
    let offset = (target - current.rem_euclid(360.0)).rem_euclid(360.0);
    EXTRA_TURNS.mul_add(360.0, offset)
}

/// Slice resting under the pointer for a wheel turned clockwise by `rotation` degrees.
pub fn slice_under_pointer(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let angle_per_slice = 360.0 / count as f64;
    let theta = (-rotation).rem_euclid(360.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (theta / angle_per_slice).floor() as usize;
    Some(index.min(count - 1))
}

fn ease_out_cubic(t: f64) -> f64 {
    let inverse = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inverse * inverse * inverse
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub id: u64,
    pub index: usize,
    pub started_at: Instant,
    pub from_rotation: f64,
    pub to_rotation: f64,
    /// Phase to fall back to if the spin is cancelled.
    resting: Resting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resting {
    Idle,
    Revealed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelPhase {
    Idle,
    Spinning(Spin),
    Revealed { index: usize },
}

impl fmt::Display for WheelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Spinning(_) => write!(f, "Spinning"),
            Self::Revealed { .. } => write!(f, "Revealed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WheelEvent {
    Spin { index: usize, count: usize, now: Instant },
    Reveal { spin_id: u64 },
    Cancel,
}

impl fmt::Display for WheelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spin { index, count, .. } => write!(f, "Spin({index}/{count})"),
            Self::Reveal { spin_id } => write!(f, "Reveal({spin_id})"),
            Self::Cancel => write!(f, "Cancel"),
        }
    }
}

/// Rejected wheel operations. The `Display` text is shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WheelError {
    #[error("Search for places before spinning")]
    NoCandidates,

    #[error("The wheel is already spinning")]
    AlreadySpinning,

    #[error("Spin {got} is no longer current")]
    StaleSpin { got: u64 },

    #[error("Invalid transition from {from} with event {event}")]
    InvalidTransition { from: String, event: String },
}

/// Handed back by [`SelectionWheel::spin`]; reveal with the same `spin_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinTicket {
    pub spin_id: u64,
    pub index: usize,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct SelectionWheel {
    phase: WheelPhase,
    total_rotation: f64,
    last_index: Option<usize>,
    spins_started: u64,
    duration: Duration,
}

impl Default for SelectionWheel {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN_DURATION)
    }
}

impl SelectionWheel {
    pub const fn new(duration: Duration) -> Self {
        Self {
            phase: WheelPhase::Idle,
            total_rotation: 0.0,
            last_index: None,
            spins_started: 0,
            duration,
        }
    }

    pub const fn phase(&self) -> WheelPhase {
        self.phase
    }

    pub const fn is_spinning(&self) -> bool {
        matches!(self.phase, WheelPhase::Spinning(_))
    }

    pub const fn total_rotation(&self) -> f64 {
        self.total_rotation
    }

    pub const fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    /// Picks a candidate uniformly at random and starts the spin animation.
    pub fn spin<R: Rng>(
        &mut self,
        count: usize,
        rng: &mut R,
        now: Instant,
    ) -> Result<SpinTicket, WheelError> {
        if self.is_spinning() {
            return Err(WheelError::AlreadySpinning);
        }
        if count == 0 {
            return Err(WheelError::NoCandidates);
        }

        let index = rng.gen_range(0..count);
        self.process_event(WheelEvent::Spin { index, count, now })?;

        Ok(SpinTicket {
            spin_id: self.spins_started,
            index,
            duration: self.duration,
        })
    }

    /// Completes the spin identified by `spin_id` and returns the chosen index.
    pub fn reveal(&mut self, spin_id: u64) -> Result<usize, WheelError> {
        self.process_event(WheelEvent::Reveal { spin_id })?;
        self.last_index
            .ok_or_else(|| WheelError::InvalidTransition {
                from: self.phase.to_string(),
                event: WheelEvent::Reveal { spin_id }.to_string(),
            })
    }

    /// Abandons a running spin; the wheel keeps its forward rotation.
    pub fn cancel(&mut self) -> Result<(), WheelError> {
        self.process_event(WheelEvent::Cancel)
    }

    /// Forgets the revealed selection after the candidate set was replaced.
    pub fn reset_selection(&mut self) {
        if let WheelPhase::Revealed { .. } = self.phase {
            self.phase = WheelPhase::Idle;
        }
        self.last_index = None;
    }

    /// Rotation to draw at `now`: eases from the previous resting angle while spinning.
    pub fn displayed_rotation(&self, now: Instant) -> f64 {
        match self.phase {
            WheelPhase::Spinning(spin) => {
                let elapsed = now.saturating_duration_since(spin.started_at);
                let progress = if self.duration.is_zero() {
                    1.0
                } else {
                    elapsed.as_secs_f64() / self.duration.as_secs_f64()
                };
                (spin.to_rotation - spin.from_rotation)
                    .mul_add(ease_out_cubic(progress), spin.from_rotation)
            }
            WheelPhase::Idle | WheelPhase::Revealed { .. } => self.total_rotation,
        }
    }

    fn process_event(&mut self, event: WheelEvent) -> Result<(), WheelError> {
        let next = match (self.phase, event) {
            (WheelPhase::Idle | WheelPhase::Revealed { .. }, WheelEvent::Spin { index, count, now }) => {
                let resting = match self.phase {
                    WheelPhase::Revealed { index } => Resting::Revealed(index),
                    _ => Resting::Idle,
                };
                let from_rotation = self.total_rotation;
                self.total_rotation += landing_rotation(from_rotation, index, count);
                self.spins_started += 1;
                debug!(
                    spin_id = self.spins_started,
                    index,
                    count,
                    rotation = self.total_rotation,
                    "spin started"
                );
                WheelPhase::Spinning(Spin {
                    id: self.spins_started,
                    index,
                    started_at: now,
                    from_rotation,
                    to_rotation: self.total_rotation,
                    resting,
                })
            }
            (WheelPhase::Spinning(spin), WheelEvent::Reveal { spin_id }) => {
                if spin.id != spin_id {
                    return Err(WheelError::StaleSpin { got: spin_id });
                }
                self.last_index = Some(spin.index);
                debug!(spin_id, index = spin.index, "spin revealed");
                WheelPhase::Revealed { index: spin.index }
            }
            (WheelPhase::Spinning(spin), WheelEvent::Cancel) => {
                debug!(spin_id = spin.id, "spin cancelled");
                match spin.resting {
                    Resting::Idle => WheelPhase::Idle,
                    Resting::Revealed(index) => WheelPhase::Revealed { index },
                }
            }
            (WheelPhase::Spinning(_), WheelEvent::Spin { .. }) => {
                return Err(WheelError::AlreadySpinning);
            }
            (WheelPhase::Idle | WheelPhase::Revealed { .. }, WheelEvent::Reveal { spin_id }) => {
                return Err(WheelError::StaleSpin { got: spin_id });
            }
            (from, event) => {
                return Err(WheelError::InvalidTransition {
                    from: from.to_string(),
                    event: event.to_string(),
                });
            }
        };

        self.phase = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn partition_covers_the_whole_circle() {
        for count in 1..=40 {
            let slices = partition(count);
            assert_eq!(slices.len(), count);
            assert!(slices[0].start_percent.abs() < f64::EPSILON);
            assert!((slices[count - 1].end_percent - 100.0).abs() < f64::EPSILON);

            let width = 100.0 / count as f64;
            for pair in slices.windows(2) {
                assert!((pair[0].end_percent - pair[1].start_percent).abs() < 1e-12);
            }
            for slice in &slices {
                assert!((slice.end_percent - slice.start_percent - width).abs() < 1e-9);
            }
        }
        assert!(partition(0).is_empty());
    }

    #[test]
    fn partition_colours_cycle_through_the_palette() {
        let colours: Vec<_> = partition(6).iter().map(|slice| slice.color).collect();
        assert_eq!(
            colours,
            [PALETTE[0], PALETTE[1], PALETTE[2], PALETTE[3], PALETTE[0], PALETTE[1]]
        );
    }

    #[test]
    fn spin_without_candidates_changes_nothing() {
        let mut wheel = SelectionWheel::default();
        let result = wheel.spin(0, &mut rng(), Instant::now());

        assert_eq!(result, Err(WheelError::NoCandidates));
        assert_eq!(wheel.phase(), WheelPhase::Idle);
        assert!(wheel.total_rotation().abs() < f64::EPSILON);
        assert_eq!(wheel.last_index(), None);
    }

    #[test]
    fn spin_is_rejected_while_spinning() {
        let mut wheel = SelectionWheel::default();
        let mut rng = rng();
        let now = Instant::now();
        let ticket = wheel.spin(5, &mut rng, now).expect("first spin");
        let rotation = wheel.total_rotation();

        assert_eq!(wheel.spin(5, &mut rng, now), Err(WheelError::AlreadySpinning));
        assert!((wheel.total_rotation() - rotation).abs() < f64::EPSILON);

        assert_eq!(wheel.reveal(ticket.spin_id), Ok(ticket.index));
        assert_eq!(wheel.phase(), WheelPhase::Revealed { index: ticket.index });
    }

    #[test]
    fn stale_reveal_is_rejected() {
        let mut wheel = SelectionWheel::default();
        let mut rng = rng();
        let first = wheel.spin(3, &mut rng, Instant::now()).expect("spin");
        wheel.reveal(first.spin_id).expect("reveal");
        let second = wheel.spin(3, &mut rng, Instant::now()).expect("spin again");

        assert_eq!(
            wheel.reveal(first.spin_id),
            Err(WheelError::StaleSpin { got: first.spin_id })
        );
        assert!(wheel.is_spinning());
        assert_eq!(wheel.reveal(second.spin_id), Ok(second.index));
        assert_eq!(
            wheel.reveal(second.spin_id),
            Err(WheelError::StaleSpin { got: second.spin_id })
        );
    }

    #[test]
    fn rotation_strictly_increases_and_lands_on_the_choice() {
        let mut wheel = SelectionWheel::default();
        let mut rng = rng();
        let mut previous = wheel.total_rotation();

        for round in 0..200 {
            let count = 1 + round % 13;
            let ticket = wheel.spin(count, &mut rng, Instant::now()).expect("spin");
            let rotation = wheel.total_rotation();

            assert!(rotation >= previous + EXTRA_TURNS * 360.0);
            assert_eq!(slice_under_pointer(rotation, count), Some(ticket.index));

            wheel.reveal(ticket.spin_id).expect("reveal");
            previous = rotation;
        }
    }

    #[test]
    fn cancel_returns_to_the_resting_phase() {
        let mut wheel = SelectionWheel::default();
        let mut rng = rng();
        let ticket = wheel.spin(4, &mut rng, Instant::now()).expect("spin");
        wheel.reveal(ticket.spin_id).expect("reveal");

        let rotation_before = wheel.total_rotation();
        wheel.spin(4, &mut rng, Instant::now()).expect("spin");
        wheel.cancel().expect("cancel");

        assert_eq!(wheel.phase(), WheelPhase::Revealed { index: ticket.index });
        assert!(wheel.total_rotation() > rotation_before);
        assert!(wheel.cancel().is_err());
    }

    #[test]
    fn displayed_rotation_eases_between_resting_angles() {
        let mut wheel = SelectionWheel::new(Duration::from_secs(4));
        let start = Instant::now();
        wheel.spin(6, &mut rng(), start).expect("spin");
        let target = wheel.total_rotation();

        let mut last = wheel.displayed_rotation(start);
        assert!(last.abs() < 1e-9);
        for step in 1..=8 {
            let shown = wheel.displayed_rotation(start + Duration::from_millis(step * 500));
            assert!(shown >= last);
            last = shown;
        }
        assert!((last - target).abs() < 1e-9);
        assert!((wheel.displayed_rotation(start + Duration::from_secs(60)) - target).abs() < 1e-9);
    }

    #[test]
    fn single_candidate_is_always_chosen() {
        let mut wheel = SelectionWheel::default();
        let mut rng = rng();
        for _ in 0..50 {
            let ticket = wheel.spin(1, &mut rng, Instant::now()).expect("spin");
            assert_eq!(wheel.reveal(ticket.spin_id), Ok(0));
        }
    }

    #[test]
    fn selection_is_uniform() {
        const COUNT: usize = 6;
        const TRIALS: usize = 60_000;

        let mut wheel = SelectionWheel::default();
        let mut rng = rng();
        let mut hits = [0_usize; COUNT];
        for _ in 0..TRIALS {
            let ticket = wheel.spin(COUNT, &mut rng, Instant::now()).expect("spin");
            hits[wheel.reveal(ticket.spin_id).expect("reveal")] += 1;
        }

        let expected = TRIALS as f64 / COUNT as f64;
        let chi_square: f64 = hits
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // Critical value for 5 degrees of freedom at p = 0.001.
        assert!(chi_square < 20.515, "chi-square {chi_square} for {hits:?}");
    }
}
