//! The shared token vector.
//!
//! Descriptors take turns scanning the same argument vector. Instead of
//! blanking strings in place, claims are recorded next to the untouched
//! original tokens. A shorthand cluster that lost only some of its
//! characters keeps its residue (`-abc` minus `b` reads as `-ac`).

use std::collections::HashMap;

pub(crate) struct Tokens {
    args: Vec<String>,
    claimed: Vec<bool>,
    residue: HashMap<usize, String>,
}

impl Tokens {
    pub fn new(args: Vec<String>) -> Self {
        let claimed = vec![false; args.len()];
        Tokens {
            args,
            claimed,
            residue: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// The current text at `i`, or `None` once it is claimed.
    /// Empty tokens read as claimed.
    pub fn get(&self, i: usize) -> Option<&str> {
        if i >= self.args.len() || self.claimed[i] {
            return None;
        }
        let text = self
            .residue
            .get(&i)
            .map(String::as_str)
            .unwrap_or(&self.args[i]);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Unclaimed, and not shaped like a flag.
    pub fn is_eligible(&self, i: usize) -> bool {
        self.get(i).is_some_and(|t| !t.starts_with('-'))
    }

    /// Length of the run of eligible tokens starting at `from`, capped at `max`.
    pub fn eligible_run(&self, from: usize, max: usize) -> usize {
        (from..self.args.len())
            .take(max)
            .take_while(|&i| self.is_eligible(i))
            .count()
    }

    pub fn claim(&mut self, i: usize) {
        if i < self.claimed.len() {
            tracing::trace!("claim token {} [{}]", i, self.args[i]);
            self.claimed[i] = true;
            self.residue.remove(&i);
        }
    }

    pub fn claim_range(&mut self, from: usize, to: usize) {
        for i in from..to {
            self.claim(i);
        }
    }

    /// Remove every occurrence of `c` from the cluster at `i`.
    /// A bare `-` left behind counts as claimed.
    pub fn strip_all(&mut self, i: usize, c: char) {
        if let Some(text) = self.get(i) {
            let rest: String = text.chars().filter(|&ch| ch != c).collect();
            self.set_residue(i, rest);
        }
    }

    /// Remove the first character after the dash from the cluster at `i`.
    pub fn strip_head(&mut self, i: usize) {
        if let Some(text) = self.get(i) {
            let mut chars = text.chars();
            let dash = chars.next();
            chars.next();
            let rest: String = dash.into_iter().chain(chars).collect();
            self.set_residue(i, rest);
        }
    }

    fn set_residue(&mut self, i: usize, rest: String) {
        if rest == "-" || rest.is_empty() {
            self.claim(i);
        } else {
            tracing::trace!("token {} [{}] reduced to [{}]", i, self.args[i], rest);
            self.residue.insert(i, rest);
        }
    }

    /// Every token nobody claimed, in order.
    pub fn unclaimed(&self) -> Vec<&str> {
        (0..self.args.len()).filter_map(|i| self.get(i)).collect()
    }
}
