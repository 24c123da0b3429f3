//! Candidate set, shuffle queue and viewing history.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::path::{Path, PathBuf};

/// A discovered image file. Equality is by path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageEntry(PathBuf);

impl ImageEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ImageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Randomized draw-without-replacement plus an append-only history with a cursor.
pub struct NavigationState {
    /// Sorted, de-duplicated.
    candidates: Vec<ImageEntry>,
    /// Current permutation; drawn from the back.
    queue: Vec<ImageEntry>,
    /// Number of permutations generated so far.
    generation: u64,
    history: Vec<ImageEntry>,
    cursor: Option<usize>,
    rng: StdRng,
}

impl NavigationState {
    /// Creates an empty state with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty state with a deterministic shuffle sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            candidates: Vec::new(),
            queue: Vec::new(),
            generation: 0,
            history: Vec::new(),
            cursor: None,
            rng,
        }
    }

    /// Replaces the candidate set.
    ///
    /// Queue entries that are no longer candidates are dropped; new candidates
    /// join at the next queue generation.
    pub fn set_candidates(&mut self, mut entries: Vec<ImageEntry>) {
        entries.sort();
        entries.dedup();
        self.candidates = entries;
        let candidates = &self.candidates;
        self.queue
            .retain(|entry| candidates.binary_search(entry).is_ok());
        debug!(
            "Candidate set now {} entries, {} left in queue",
            self.candidates.len(),
            self.queue.len()
        );
    }

    /// Empties candidates and queue. History is kept.
    pub fn clear_candidates(&mut self) {
        self.candidates.clear();
        self.queue.clear();
    }

    /// Removes an entry that turned out to be unusable.
    pub fn forget(&mut self, entry: &ImageEntry) {
        if let Ok(index) = self.candidates.binary_search(entry) {
            self.candidates.remove(index);
        }
        self.queue.retain(|queued| queued != entry);
        warn!("Dropped {} from candidates", entry);
    }

    /// Takes the next entry from the queue, reshuffling when it is exhausted.
    ///
    /// Returns `None` when there are no candidates. History is not touched.
    pub fn draw(&mut self) -> Option<ImageEntry> {
        if self.queue.is_empty() {
            if self.candidates.is_empty() {
                return None;
            }
            self.queue = self.candidates.clone();
            self.queue.shuffle(&mut self.rng);
            self.generation += 1;
            debug!(
                "Generated shuffle queue #{} with {} entries",
                self.generation,
                self.queue.len()
            );
        }
        self.queue.pop()
    }

    /// Appends to history and moves the cursor to the new last entry.
    pub fn push_history(&mut self, entry: ImageEntry) {
        self.history.push(entry);
        self.cursor = Some(self.history.len() - 1);
    }

    /// Moves the cursor back one step and returns the entry there.
    pub fn step_back(&mut self) -> Option<ImageEntry> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                Some(self.history[cursor - 1].clone())
            }
            _ => None,
        }
    }

    /// Moves the cursor forward one step, undoing a [`step_back`](Self::step_back).
    pub fn step_forward(&mut self) {
        if let Some(cursor) = self.cursor {
            if cursor + 1 < self.history.len() {
                self.cursor = Some(cursor + 1);
            }
        }
    }

    pub fn current(&self) -> Option<&ImageEntry> {
        self.cursor.map(|cursor| &self.history[cursor])
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn history(&self) -> &[ImageEntry] {
        &self.history
    }

    pub fn candidates(&self) -> &[ImageEntry] {
        &self.candidates
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entries(names: &[&str]) -> Vec<ImageEntry> {
        names
            .iter()
            .map(|name| ImageEntry::new(format!("/refs/{name}")))
            .collect()
    }

    #[test]
    fn empty_state_draws_nothing() {
        let mut state = NavigationState::with_seed(1);
        assert_eq!(state.draw(), None);
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn each_generation_exhausts_every_entry_once() {
        let mut state = NavigationState::with_seed(7);
        let all = entries(&["a.png", "b.png", "c.jpg", "d.jpeg", "e.png"]);
        state.set_candidates(all.clone());

        for generation in 1..=4 {
            let drawn: Vec<_> = (0..all.len()).map(|_| state.draw().unwrap()).collect();
            let unique: HashSet<_> = drawn.iter().cloned().collect();
            assert_eq!(unique.len(), all.len(), "repeat within generation {generation}");
            assert_eq!(state.generation(), generation);
            assert_eq!(state.queue_len(), 0);
        }
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let all = entries(&["a.png", "b.png", "c.png", "d.png", "e.png", "f.png"]);
        let mut first = NavigationState::with_seed(42);
        let mut second = NavigationState::with_seed(42);
        first.set_candidates(all.clone());
        second.set_candidates(all);
        for _ in 0..12 {
            assert_eq!(first.draw(), second.draw());
        }
    }

    #[test]
    fn candidates_are_sorted_and_deduplicated() {
        let mut state = NavigationState::with_seed(3);
        state.set_candidates(entries(&["b.png", "a.png", "b.png"]));
        assert_eq!(state.candidates(), entries(&["a.png", "b.png"]).as_slice());
    }

    #[test]
    fn refresh_drops_vanished_entries_from_queue() {
        let mut state = NavigationState::with_seed(9);
        state.set_candidates(entries(&["a.png", "b.png", "c.png"]));
        let first = state.draw().unwrap();
        assert_eq!(state.queue_len(), 2);

        let survivors: Vec<_> = state
            .candidates()
            .iter()
            .filter(|entry| **entry != first)
            .take(1)
            .cloned()
            .collect();
        state.set_candidates(survivors.clone());
        assert_eq!(state.queue_len(), 1);
        assert_eq!(state.draw(), Some(survivors[0].clone()));
    }

    #[test]
    fn forget_removes_from_candidates_and_queue() {
        let mut state = NavigationState::with_seed(5);
        let all = entries(&["a.png", "b.png"]);
        state.set_candidates(all.clone());
        let drawn = state.draw().unwrap();
        let remaining = all.into_iter().find(|entry| *entry != drawn).unwrap();

        state.forget(&remaining);
        assert_eq!(state.queue_len(), 0);
        assert_eq!(state.candidates(), std::slice::from_ref(&drawn));
    }

    #[test]
    fn back_returns_previous_and_stops_at_zero() {
        let mut state = NavigationState::with_seed(11);
        for entry in entries(&["a.png", "b.png", "c.png"]) {
            state.push_history(entry);
        }
        assert_eq!(state.cursor(), Some(2));

        assert_eq!(state.step_back(), Some(ImageEntry::new("/refs/b.png")));
        assert_eq!(state.step_back(), Some(ImageEntry::new("/refs/a.png")));
        assert_eq!(state.step_back(), None);
        assert_eq!(state.step_back(), None);
        assert_eq!(state.cursor(), Some(0));
        assert_eq!(state.history().len(), 3);
    }

    #[test]
    fn push_after_back_keeps_forward_history() {
        let mut state = NavigationState::with_seed(11);
        for entry in entries(&["a.png", "b.png", "c.png"]) {
            state.push_history(entry);
        }
        state.step_back();
        state.step_back();
        state.push_history(ImageEntry::new("/refs/d.png"));

        assert_eq!(state.history().len(), 4);
        assert_eq!(state.cursor(), Some(3));
        assert_eq!(state.current(), Some(&ImageEntry::new("/refs/d.png")));
    }

    #[test]
    fn back_on_empty_history_is_none() {
        let mut state = NavigationState::with_seed(2);
        assert_eq!(state.step_back(), None);
        assert_eq!(state.cursor(), None);
    }

    #[test]
    fn clear_candidates_keeps_history() {
        let mut state = NavigationState::with_seed(4);
        state.set_candidates(entries(&["a.png"]));
        let entry = state.draw().unwrap();
        state.push_history(entry);
        state.clear_candidates();
        assert_eq!(state.candidate_count(), 0);
        assert_eq!(state.history().len(), 1);
    }
}
