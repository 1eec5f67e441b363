//! Arc group sequencing: parallel and sequential playback of a finite arc
//! set, plus the never-ending random spawner behind "free mode".

use foundation::math::Vec3;
use foundation::time::Time;
use formats::trips::{ArcLocation, CityLocation, arc_cities};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runtime::timers::TimerQueue;

use crate::arcs::anim::{ArcAnimation, DrawPolicy, DrawRange};
use crate::arcs::path::ArcPath;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sequencing {
    /// Every arc starts immediately and animates independently.
    Parallel,
    /// Arc i+1 starts only after arc i reports done, with a short gap.
    Sequential,
}

/// What happens when every arc in a finite group has completed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OnAllArcsDone {
    /// Leave the final state; fully-grown arcs swap to a static mesh.
    Persist,
    /// Hide everything.
    Remove,
    /// Clear and replay the whole sequence after a short delay.
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcGroupConfig {
    /// Sphere radius arcs are anchored to (endpoints sit on this shell).
    pub radius: f64,
    pub height_factor: f64,
    pub duration_s: f64,
    /// Optional override for the very first arc of a finite set.
    pub first_duration_s: Option<f64>,
    pub policy: DrawPolicy,
    pub sequencing: Sequencing,
    pub on_all_done: OnAllArcsDone,
    /// Pause between sequential arcs.
    pub gap_s: f64,
    /// Delay before a reset replays the sequence.
    pub reset_delay_s: f64,
    /// Free mode: seconds between random spawns.
    pub spawn_interval_s: f64,
    /// Free mode: per-arc random start delay, so simultaneous spawns don't
    /// visually synchronize.
    pub spawn_jitter_s: f64,
}

impl Default for ArcGroupConfig {
    fn default() -> Self {
        Self {
            radius: 150.0,
            height_factor: crate::arcs::path::ARC_HEIGHT_FACTOR,
            duration_s: 2.5,
            first_duration_s: None,
            policy: DrawPolicy::GrowPersist,
            sequencing: Sequencing::Parallel,
            on_all_done: OnAllArcsDone::Persist,
            gap_s: 0.5,
            reset_delay_s: 0.5,
            spawn_interval_s: 1.5,
            spawn_jitter_s: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArcEvent {
    /// An arc reached its landing moment; spawn a pulse at `position`.
    Landing { arc: u64, position: Vec3 },
    ArcDone { arc: u64 },
    /// Every arc of a finite group has completed (fires once per playback).
    AllDone,
    /// A reset replayed the sequence.
    SequenceRestarted,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibleArc {
    pub path: ArcPath,
    pub range: DrawRange,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ArcTask {
    SpawnRandom,
    Start(u64),
    Reset,
}

#[derive(Debug)]
struct ActiveArc {
    arc_id: u64,
    path: ArcPath,
    anim: Option<ArcAnimation>,
    completed: bool,
}

#[derive(Debug)]
struct FreeMode {
    pool: Vec<CityLocation>,
    rng: StdRng,
}

/// A set of arcs animating over the globe.
///
/// Owns its schedule as explicit timers; dropping (or `clear`ing) the group
/// cancels every pending spawn/start/reset, so nothing fires after the
/// layer is torn down.
#[derive(Debug)]
pub struct ArcGroup {
    config: ArcGroupConfig,
    source: Vec<ArcLocation>,
    arcs: Vec<ActiveArc>,
    timers: TimerQueue<ArcTask>,
    free: Option<FreeMode>,
    next_arc_id: u64,
    done_count: usize,
    all_done_fired: bool,
    show_static: bool,
    hidden: bool,
}

impl ArcGroup {
    /// Play a finite arc set, parallel or sequential per the config.
    pub fn play(locations: Vec<ArcLocation>, config: ArcGroupConfig, now: Time) -> Self {
        let mut group = Self {
            config,
            source: locations,
            arcs: Vec::new(),
            timers: TimerQueue::new(),
            free: None,
            next_arc_id: 0,
            done_count: 0,
            all_done_fired: false,
            show_static: false,
            hidden: false,
        };
        group.build_from_source(now);
        group
    }

    /// Free mode: endlessly spawn random connections between the cities
    /// behind `locations`.
    pub fn free(locations: &[ArcLocation], seed: u64, config: ArcGroupConfig, now: Time) -> Self {
        let pool = arc_cities(locations);
        let mut group = Self {
            config,
            source: Vec::new(),
            arcs: Vec::new(),
            timers: TimerQueue::new(),
            free: None,
            next_arc_id: 0,
            done_count: 0,
            all_done_fired: false,
            show_static: false,
            hidden: false,
        };
        // A pool smaller than two points can't form a connection.
        if pool.len() >= 2 {
            group
                .timers
                .schedule_every(now, group.config.spawn_interval_s, ArcTask::SpawnRandom);
            group.free = Some(FreeMode {
                pool,
                rng: StdRng::seed_from_u64(seed),
            });
        }
        group
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn done_count(&self) -> usize {
        self.done_count
    }

    pub fn is_free_mode(&self) -> bool {
        self.free.is_some()
    }

    /// Cancel all pending work and drop every arc.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.arcs.clear();
        self.free = None;
        self.done_count = 0;
        self.all_done_fired = false;
        self.show_static = false;
    }

    /// Advance the group to `now`. Fires due timers, polls arc clocks, and
    /// garbage-collects completed arcs in free mode.
    pub fn update(&mut self, now: Time) -> Vec<ArcEvent> {
        let mut events = Vec::new();

        for (_, task) in self.timers.fire_due(now) {
            match task {
                ArcTask::SpawnRandom => self.spawn_random(now),
                ArcTask::Start(arc_id) => {
                    let duration_s = self.config.duration_s;
                    let policy = self.config.policy;
                    if let Some(arc) = self.arcs.iter_mut().find(|a| a.arc_id == arc_id) {
                        if arc.anim.is_none() {
                            arc.anim = Some(ArcAnimation::new(now, duration_s, policy));
                        }
                    }
                }
                ArcTask::Reset => {
                    self.build_from_source(now);
                    events.push(ArcEvent::SequenceRestarted);
                }
            }
        }

        let mut finished: Vec<u64> = Vec::new();
        for arc in &mut self.arcs {
            let Some(anim) = arc.anim.as_mut() else {
                continue;
            };
            let tick = anim.poll(now);
            if tick.landing {
                events.push(ArcEvent::Landing {
                    arc: arc.arc_id,
                    position: arc.path.end,
                });
            }
            if tick.done {
                arc.completed = true;
                self.done_count += 1;
                finished.push(arc.arc_id);
                events.push(ArcEvent::ArcDone { arc: arc.arc_id });
            }
        }

        if !finished.is_empty() && self.config.sequencing == Sequencing::Sequential {
            self.schedule_next_start(now);
        }

        // Free mode: completed arcs leave the active set to bound memory.
        if self.free.is_some() && self.config.policy != DrawPolicy::GrowPersist {
            self.arcs.retain(|a| !a.completed);
        }

        if self.free.is_none()
            && !self.arcs.is_empty()
            && self.done_count == self.arcs.len()
            && !self.all_done_fired
        {
            self.all_done_fired = true;
            events.push(ArcEvent::AllDone);
            match self.config.on_all_done {
                OnAllArcsDone::Persist => {
                    if self.config.policy == DrawPolicy::GrowPersist {
                        self.show_static = true;
                    }
                }
                OnAllArcsDone::Remove => {
                    self.hidden = true;
                }
                OnAllArcsDone::Reset => {
                    self.timers
                        .schedule_in(now, self.config.reset_delay_s, ArcTask::Reset);
                }
            }
        }

        events
    }

    /// Animated arcs with a non-empty draw window at `now`.
    pub fn visible_arcs(&self, now: Time) -> Vec<VisibleArc> {
        if self.hidden || self.show_static {
            return Vec::new();
        }
        self.arcs
            .iter()
            .filter_map(|arc| {
                let anim = arc.anim.as_ref()?;
                let range = anim.draw_range(now);
                range.visible().then_some(VisibleArc {
                    path: arc.path,
                    range,
                })
            })
            .collect()
    }

    /// After a persist-all-done, the fully drawn arcs as one static set.
    pub fn static_paths(&self) -> Option<Vec<ArcPath>> {
        if !self.show_static {
            return None;
        }
        Some(self.arcs.iter().map(|a| a.path).collect())
    }

    fn build_from_source(&mut self, now: Time) {
        self.arcs.clear();
        self.done_count = 0;
        self.all_done_fired = false;
        self.show_static = false;
        self.hidden = false;

        let locations = self.source.clone();
        for (index, location) in locations.iter().enumerate() {
            let arc_id = self.alloc_arc_id();
            let path = ArcPath::between_cities(
                &location.start,
                &location.end,
                self.config.radius,
                self.config.height_factor,
            );
            let duration_s = match (index, self.config.first_duration_s) {
                (0, Some(first)) => first,
                _ => self.config.duration_s,
            };
            let anim = match self.config.sequencing {
                Sequencing::Parallel => Some(ArcAnimation::new(now, duration_s, self.config.policy)),
                Sequencing::Sequential if index == 0 => {
                    Some(ArcAnimation::new(now, duration_s, self.config.policy))
                }
                Sequencing::Sequential => None,
            };
            self.arcs.push(ActiveArc {
                arc_id,
                path,
                anim,
                completed: false,
            });
        }
    }

    fn schedule_next_start(&mut self, now: Time) {
        let Some(next_id) = self
            .arcs
            .iter()
            .find(|a| a.anim.is_none())
            .map(|a| a.arc_id)
        else {
            return;
        };
        self.timers
            .schedule_in(now, self.config.gap_s, ArcTask::Start(next_id));
    }

    fn spawn_random(&mut self, now: Time) {
        let Some(free) = self.free.as_mut() else {
            return;
        };

        let len = free.pool.len();
        let start_idx = free.rng.gen_range(0..len);
        let mut end_idx = free.rng.gen_range(0..len);
        while end_idx == start_idx {
            end_idx = free.rng.gen_range(0..len);
        }
        let jitter = if self.config.spawn_jitter_s > 0.0 {
            free.rng.gen_range(0.0..self.config.spawn_jitter_s)
        } else {
            0.0
        };

        let path = ArcPath::between_cities(
            &free.pool[start_idx],
            &free.pool[end_idx],
            self.config.radius,
            self.config.height_factor,
        );
        let arc_id = self.alloc_arc_id();
        self.arcs.push(ActiveArc {
            arc_id,
            path,
            // The clock starts in the future; the arc stays hidden until
            // its jittered start passes.
            anim: Some(ArcAnimation::new(
                now + jitter,
                self.config.duration_s,
                self.config.policy,
            )),
            completed: false,
        });
    }

    fn alloc_arc_id(&mut self) -> u64 {
        let id = self.next_arc_id;
        self.next_arc_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::{ArcEvent, ArcGroup, ArcGroupConfig, OnAllArcsDone, Sequencing};
    use crate::arcs::anim::DrawPolicy;
    use foundation::time::Time;
    use formats::trips::{ArcLocation, CityLocation};

    fn city(lat: f64, lon: f64, name: &str) -> CityLocation {
        CityLocation::new(lat, lon, name).expect("valid city")
    }

    fn locations() -> Vec<ArcLocation> {
        let nyc = city(40.7128, -74.006, "NYC");
        let dallas = city(32.7767, -96.797, "Dallas");
        let seattle = city(47.6062, -122.3321, "Seattle");
        let bogota = city(4.711, -74.0721, "Bogota");
        vec![
            ArcLocation::new(nyc.clone(), dallas.clone()),
            ArcLocation::new(dallas, seattle.clone()),
            ArcLocation::new(seattle, bogota),
        ]
    }

    fn config(policy: DrawPolicy, sequencing: Sequencing, on_all_done: OnAllArcsDone) -> ArcGroupConfig {
        ArcGroupConfig {
            duration_s: 1.0,
            policy,
            sequencing,
            on_all_done,
            ..ArcGroupConfig::default()
        }
    }

    #[test]
    fn parallel_arcs_all_animate_immediately() {
        let cfg = config(
            DrawPolicy::GrowPersist,
            Sequencing::Parallel,
            OnAllArcsDone::Persist,
        );
        let mut group = ArcGroup::play(locations(), cfg, Time(0.0));

        group.update(Time(0.5));
        assert_eq!(group.visible_arcs(Time(0.5)).len(), 3);
    }

    #[test]
    fn sequential_arc_waits_for_predecessor_done() {
        let cfg = config(
            DrawPolicy::GrowPersist,
            Sequencing::Sequential,
            OnAllArcsDone::Persist,
        );
        let mut group = ArcGroup::play(locations(), cfg, Time(0.0));

        // Mid-flight of arc 0: nothing else is visible.
        group.update(Time(0.5));
        assert_eq!(group.visible_arcs(Time(0.5)).len(), 1);

        // Arc 0 done at t=1; arc 1 must not have begun during the gap.
        let events = group.update(Time(1.0));
        assert!(events.iter().any(|e| matches!(e, ArcEvent::ArcDone { arc: 0 })));
        group.update(Time(1.2));
        assert_eq!(
            group.visible_arcs(Time(1.2)).len(),
            1, // arc 0 persists; arc 1 hasn't started
        );

        // After the 0.5s gap, arc 1 starts growing.
        group.update(Time(1.5));
        group.update(Time(1.6));
        assert_eq!(group.visible_arcs(Time(1.6)).len(), 2);
    }

    #[test]
    fn persist_all_done_swaps_to_static_mesh() {
        let cfg = config(
            DrawPolicy::GrowPersist,
            Sequencing::Parallel,
            OnAllArcsDone::Persist,
        );
        let mut group = ArcGroup::play(locations(), cfg, Time(0.0));

        let events = group.update(Time(1.0));
        assert!(events.iter().any(|e| matches!(e, ArcEvent::AllDone)));
        assert!(group.visible_arcs(Time(1.0)).is_empty());
        assert_eq!(group.static_paths().expect("static").len(), 3);

        // AllDone only fires once.
        assert!(group.update(Time(2.0)).is_empty());
    }

    #[test]
    fn remove_all_done_hides_everything() {
        let cfg = config(
            DrawPolicy::GrowPersist,
            Sequencing::Parallel,
            OnAllArcsDone::Remove,
        );
        let mut group = ArcGroup::play(locations(), cfg, Time(0.0));
        group.update(Time(1.0));
        assert!(group.visible_arcs(Time(1.0)).is_empty());
        assert!(group.static_paths().is_none());
    }

    #[test]
    fn reset_replays_the_sequence_after_a_delay() {
        let cfg = config(
            DrawPolicy::GrowPersist,
            Sequencing::Parallel,
            OnAllArcsDone::Reset,
        );
        let mut group = ArcGroup::play(locations(), cfg, Time(0.0));

        group.update(Time(1.0));
        // Inside the reset delay: still the finished state.
        assert!(group.update(Time(1.2)).is_empty());

        let events = group.update(Time(1.5));
        assert!(events.iter().any(|e| matches!(e, ArcEvent::SequenceRestarted)));
        // Fresh playback: arcs grow again.
        assert_eq!(group.visible_arcs(Time(1.7)).len(), 3);
    }

    #[test]
    fn landing_fires_when_retraction_begins() {
        let cfg = config(
            DrawPolicy::GrowRetract,
            Sequencing::Parallel,
            OnAllArcsDone::Remove,
        );
        let mut group = ArcGroup::play(vec![locations().remove(0)], cfg, Time(0.0));

        assert!(group.update(Time(0.4)).is_empty());
        let events = group.update(Time(0.6));
        assert!(events.iter().any(|e| matches!(e, ArcEvent::Landing { arc: 0, .. })));
    }

    #[test]
    fn free_mode_spawns_and_garbage_collects() {
        let cfg = config(
            DrawPolicy::GrowRetract,
            Sequencing::Parallel,
            OnAllArcsDone::Persist,
        );
        let mut group = ArcGroup::free(&locations(), 7, cfg, Time(0.0));
        assert!(group.is_free_mode());
        assert_eq!(group.arc_count(), 0);

        group.update(Time(1.5));
        assert_eq!(group.arc_count(), 1);
        group.update(Time(2.0));
        assert_eq!(group.arc_count(), 1);

        // Spawn jitter is under 0.5s and duration is 1.0s, so by t=3 the
        // first arc has completed and been collected while the second
        // spawns in the same update.
        group.update(Time(3.0));
        assert_eq!(group.arc_count(), 1);
        assert_eq!(group.done_count(), 1);
    }

    #[test]
    fn free_mode_needs_at_least_two_cities() {
        let cfg = ArcGroupConfig::default();
        let group = ArcGroup::free(&[], 7, cfg, Time(0.0));
        assert!(!group.is_free_mode());
    }

    #[test]
    fn clear_cancels_pending_work() {
        let cfg = config(
            DrawPolicy::GrowPersist,
            Sequencing::Parallel,
            OnAllArcsDone::Reset,
        );
        let mut group = ArcGroup::play(locations(), cfg, Time(0.0));
        group.update(Time(1.0)); // schedules the reset
        group.clear();
        assert!(group.update(Time(10.0)).is_empty());
        assert_eq!(group.arc_count(), 0);
    }
}
