use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use table_capture::{crop_rect, Frame, FrameSource, Rect, TableLayout};
use table_data::{StartingHand, StrengthTable};
use table_state::{BoardMachine, BoardPhase, HandMachine, HandPhase, ObservedCards, PhaseObserver};
use table_vision::{indicator_lit, CardMatcher, SettleDetector};

use crate::output::TrackerStatus;

/// Settle-detector keys for the two watched slot groups.
const HAND_REGION: &str = "hand";
const BOARD_REGION: &str = "board";

/// Extracts hole cards and scores them when the hand machine flips to
/// playing; clears both when the seat sits out.
struct HoleExtractor {
    slots: [Rect; 2],
    matcher: Rc<CardMatcher>,
    strength_table: Rc<StrengthTable>,
    hole_cards: Rc<RefCell<ObservedCards>>,
    hand_strength: Rc<RefCell<Option<StartingHand>>>,
}

impl PhaseObserver<HandPhase> for HoleExtractor {
    fn on_transition(&mut self, phase: HandPhase, frame: &Frame) {
        match phase {
            HandPhase::SittingOut => {
                self.hole_cards.borrow_mut().clear();
                *self.hand_strength.borrow_mut() = None;
            }
            HandPhase::Playing => {
                let first = self.matcher.classify(&crop_rect(&frame.pixels, &self.slots[0]));
                let second = self.matcher.classify(&crop_rect(&frame.pixels, &self.slots[1]));
                {
                    let mut cards = self.hole_cards.borrow_mut();
                    cards.push(first);
                    cards.push(second);
                }
                let strength = self.strength_table.evaluate([first, second]);
                info!("dealt {} {} -> {}", first, second, strength);
                *self.hand_strength.borrow_mut() = Some(strength);
            }
        }
    }
}

/// Appends community cards slot by slot as the board machine advances;
/// clears the board on the reset to preflop.
struct BoardExtractor {
    slots: [Rect; 5],
    matcher: Rc<CardMatcher>,
    board_cards: Rc<RefCell<ObservedCards>>,
}

impl BoardExtractor {
    fn append_slot(&self, index: usize, frame: &Frame) {
        let code = self.matcher.classify(&crop_rect(&frame.pixels, &self.slots[index]));
        debug!("board slot {} -> {}", index + 1, code);
        self.board_cards.borrow_mut().push(code);
    }
}

impl PhaseObserver<BoardPhase> for BoardExtractor {
    fn on_transition(&mut self, phase: BoardPhase, frame: &Frame) {
        match phase {
            BoardPhase::Preflop => self.board_cards.borrow_mut().clear(),
            BoardPhase::Flop => {
                for index in 0..3 {
                    self.append_slot(index, frame);
                }
            }
            BoardPhase::Turn => self.append_slot(3, frame),
            BoardPhase::River => {
                // A river re-trigger after the board already filled must
                // not sample the slot again.
                if self.board_cards.borrow().len() < 5 {
                    self.append_slot(4, frame);
                }
            }
        }
    }
}

/// Rolling frames-per-second estimate, reset every few seconds so the
/// figure follows the current rate rather than the lifetime average.
struct FpsEstimator {
    frames: u64,
    since: Instant,
    fps: f64,
}

impl FpsEstimator {
    fn new() -> Self {
        Self {
            frames: 0,
            since: Instant::now(),
            fps: 0.0,
        }
    }

    fn record(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.fps = self.frames as f64 / elapsed;
        }
        if elapsed > 5.0 {
            self.frames = 0;
            self.since = Instant::now();
        }
    }

    fn estimate(&self) -> f64 {
        self.fps
    }
}

/// The tick driver: pulls one frame per tick, gates each slot group on
/// the settle detector, samples the indicator pixels, and advances the
/// phase machines. All mutable state is owned here or shared only with
/// the observers registered on the machines; everything runs on the
/// loop's thread.
pub struct Tracker {
    source: Box<dyn FrameSource>,
    layout: TableLayout,
    settle: SettleDetector,
    settle_duration: Duration,
    hand_machine: HandMachine,
    board_machine: BoardMachine,
    hole_cards: Rc<RefCell<ObservedCards>>,
    board_cards: Rc<RefCell<ObservedCards>>,
    hand_strength: Rc<RefCell<Option<StartingHand>>>,
    fps: FpsEstimator,
}

impl Tracker {
    pub fn new(
        source: Box<dyn FrameSource>,
        layout: TableLayout,
        matcher: Rc<CardMatcher>,
        strength_table: Rc<StrengthTable>,
        settle_duration: Duration,
    ) -> Self {
        let hole_cards = Rc::new(RefCell::new(ObservedCards::hand()));
        let board_cards = Rc::new(RefCell::new(ObservedCards::board()));
        let hand_strength = Rc::new(RefCell::new(None));

        let mut hand_machine = HandMachine::new();
        hand_machine.register(
            "hole-extractor",
            Box::new(HoleExtractor {
                slots: layout.hole_slots,
                matcher: matcher.clone(),
                strength_table,
                hole_cards: hole_cards.clone(),
                hand_strength: hand_strength.clone(),
            }),
        );

        let mut board_machine = BoardMachine::new();
        board_machine.register(
            "board-extractor",
            Box::new(BoardExtractor {
                slots: layout.board_slots,
                matcher,
                board_cards: board_cards.clone(),
            }),
        );

        Self {
            source,
            layout,
            settle: SettleDetector::new(),
            settle_duration,
            hand_machine,
            board_machine,
            hole_cards,
            board_cards,
            hand_strength,
            fps: FpsEstimator::new(),
        }
    }

    /// Run one tick. Returns false when no frame was available (or the
    /// frame was unusable) and nothing was mutated.
    pub fn tick(&mut self) -> Result<bool> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(false);
        };

        let (need_w, need_h) = self.layout.required_size();
        if frame.pixels.width() < need_w || frame.pixels.height() < need_h {
            warn!(
                "frame {}x{} smaller than calibrated table {}x{}; tick skipped",
                frame.pixels.width(),
                frame.pixels.height(),
                need_w,
                need_h,
            );
            return Ok(false);
        }

        self.settle.watch(HAND_REGION, &frame, self.settle_duration);
        self.settle.poll(HAND_REGION, &frame, &self.layout.hand_bounds);
        if !self.settle.is_animating(HAND_REGION) {
            if indicator_lit(&frame, &self.layout.hole_indicator) {
                self.hand_machine.playing(&frame);
            } else {
                self.hand_machine.sitting_out(&frame);
            }
        }

        self.settle.watch(BOARD_REGION, &frame, self.settle_duration);
        self.settle.poll(BOARD_REGION, &frame, &self.layout.board_bounds);
        if !self.settle.is_animating(BOARD_REGION) {
            // Test in descending progression order so the furthest lit
            // indicator wins the tick.
            let [flop_px, turn_px, river_px] = &self.layout.board_indicators;
            if indicator_lit(&frame, river_px) {
                self.board_machine.river(&frame);
            } else if indicator_lit(&frame, turn_px) {
                self.board_machine.turn(&frame);
            } else if indicator_lit(&frame, flop_px) {
                self.board_machine.flop(&frame);
            } else {
                self.board_machine.preflop(&frame);
            }
        }

        self.fps.record();
        Ok(true)
    }

    pub fn status(&self) -> TrackerStatus {
        TrackerStatus {
            fps: self.fps.estimate(),
            hand_phase: self.hand_machine.current(),
            hole_cards: self.hole_cards.borrow().codes(),
            board_phase: self.board_machine.current(),
            board_cards: self.board_cards.borrow().codes(),
        }
    }

    /// Strength record for the current hole cards, if a hand is live.
    pub fn hand_strength(&self) -> Option<StartingHand> {
        self.hand_strength.borrow().clone()
    }

    /// Drive ticks at a fixed rate until the stop flag is set. The flag
    /// is checked between ticks only; a tick always completes.
    pub async fn run(
        &mut self,
        stop: Arc<AtomicBool>,
        interval: Duration,
        mut on_tick: impl FnMut(&TrackerStatus),
    ) {
        info!("tracker loop started, interval {:?}", interval);
        while !stop.load(Ordering::Relaxed) {
            let started = Instant::now();
            match self.tick() {
                Ok(true) => on_tick(&self.status()),
                Ok(false) => debug!("tick skipped"),
                Err(e) => warn!("tick failed: {e:#}"),
            }

            let elapsed = started.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        info!("tracker loop stopped");
    }
}
