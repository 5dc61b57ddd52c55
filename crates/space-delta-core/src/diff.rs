//! Minimal edit scripts between two byte sequences.
//!
//! The shared prefix and suffix are stripped first. The differing middle is
//! aligned with Myers' greedy algorithm, and every run of unmatched bytes
//! between two aligned runs becomes one [`Delta`].
//!
//! When a deletion and an insertion reach equally far along a diagonal the
//! deletion wins, so in an ambiguous block the bytes of `a` are dropped
//! before the bytes of `b` are written.

use bytes::Bytes;

use crate::delta::{Delta, EditScript};

/// Compute an edit script turning `a` into `b`.
///
/// Replaying the result against `a` yields exactly `b`. Identical inputs
/// give an empty script.
pub fn diff(a: &[u8], b: &[u8]) -> EditScript {
    if a == b {
        return EditScript::new();
    }

    let prefix = common_prefix(a, b);
    let suffix = common_suffix(&a[prefix..], &b[prefix..]);

    let old = &a[prefix..a.len() - suffix];
    let new = &b[prefix..b.len() - suffix];

    let matches = align(old, new);
    hunks(old, new, &matches, prefix)
}

/// Length of the longest common prefix.
fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Length of the longest common suffix.
fn common_suffix(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Diagonal steps whose frontiers are kept side by side while unwinding.
const LEAF_STEPS: isize = 8;

/// Align `old` against `new`, returning matched `(old, new)` index pairs in
/// increasing order.
///
/// `x` indexes `old`, `y` indexes `new`, and diagonal `k = x - y`. A move
/// right deletes `old[x]`, a move down inserts `new[y]`.
///
/// Only the frontier of the greedy search is stored. The backtrack
/// recomputes earlier frontiers from checkpoints, so memory stays at
/// O((N + M) log D) while time is O((N + M) D log D).
fn align(old: &[u8], new: &[u8]) -> Vec<(usize, usize)> {
    if old.is_empty() || new.is_empty() || !shares_byte(old, new) {
        return Vec::new();
    }

    let search = Search::new(old, new);
    let mut v = search.frontier();
    let mut distance = 0;
    while !search.step(&mut v, distance) {
        distance += 1;
    }

    let mut walk = Backtrack {
        x: search.n,
        y: search.m,
        matches: Vec::new(),
    };
    search.unwind(search.frontier(), 0, distance + 1, &mut walk);

    walk.matches.reverse();
    walk.matches
}

/// True if some byte value occurs in both inputs.
fn shares_byte(old: &[u8], new: &[u8]) -> bool {
    let mut seen = [false; 256];
    for &b in old {
        seen[b as usize] = true;
    }
    new.iter().any(|&b| seen[b as usize])
}

/// The greedy forward search over one pair of inputs.
struct Search<'a> {
    old: &'a [u8],
    new: &'a [u8],
    n: isize,
    m: isize,
    // v[k + origin] holds the furthest x reached on diagonal k.
    origin: isize,
}

impl<'a> Search<'a> {
    fn new(old: &'a [u8], new: &'a [u8]) -> Self {
        let n = old.len() as isize;
        let m = new.len() as isize;
        Self {
            old,
            new,
            n,
            m,
            origin: n + m + 1,
        }
    }

    /// The frontier before step 0.
    fn frontier(&self) -> Vec<isize> {
        vec![0; (2 * self.origin + 1) as usize]
    }

    /// Advance `v` through step `d`. Returns true once `(n, m)` is reached.
    fn step(&self, v: &mut [isize], d: isize) -> bool {
        let mut k = -d;
        while k <= d {
            let at = (self.origin + k) as usize;
            let mut x = if k == -d || (k != d && v[at - 1] < v[at + 1]) {
                v[at + 1]
            } else {
                v[at - 1] + 1
            };
            let mut y = x - k;
            while x < self.n && y < self.m && self.old[x as usize] == self.new[y as usize] {
                x += 1;
                y += 1;
            }
            v[at] = x;

            if x >= self.n && y >= self.m {
                return true;
            }
            k += 2;
        }
        false
    }

    /// Backtrack steps `hi - 1` down to `lo`, given the frontier before
    /// step `lo`.
    fn unwind(&self, start: Vec<isize>, lo: isize, hi: isize, walk: &mut Backtrack) {
        if hi - lo <= LEAF_STEPS {
            let mut frontiers = Vec::with_capacity((hi - lo) as usize);
            frontiers.push(start);
            for d in lo..hi - 1 {
                let mut next = frontiers[frontiers.len() - 1].clone();
                self.step(&mut next, d);
                frontiers.push(next);
            }
            for (i, v) in frontiers.iter().enumerate().rev() {
                walk.back(self.origin, lo + i as isize, v);
            }
            return;
        }

        let mid = lo + (hi - lo) / 2;
        let mut checkpoint = start.clone();
        for d in lo..mid {
            self.step(&mut checkpoint, d);
        }
        self.unwind(checkpoint, mid, hi, walk);
        self.unwind(start, lo, mid, walk);
    }
}

/// Position of the backward walk from `(n, m)` to the origin.
struct Backtrack {
    x: isize,
    y: isize,
    matches: Vec<(usize, usize)>,
}

impl Backtrack {
    /// Undo step `d`, where `v` is the frontier as it stood before it.
    fn back(&mut self, origin: isize, d: isize, v: &[isize]) {
        if d == 0 {
            while self.x > 0 && self.y > 0 {
                self.diagonal();
            }
            return;
        }

        let at = |k: isize| v[(origin + k) as usize];
        let k = self.x - self.y;
        let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = at(prev_k);
        let prev_y = prev_x - prev_k;

        while self.x > prev_x && self.y > prev_y {
            self.diagonal();
        }
        self.x = prev_x;
        self.y = prev_y;
    }

    fn diagonal(&mut self) {
        self.x -= 1;
        self.y -= 1;
        self.matches.push((self.x as usize, self.y as usize));
    }
}

/// Turn aligned pairs into one delta per gap between them.
///
/// Every offset is a position in `b`: by the time a hunk is replayed, all
/// bytes before it already read as `b`.
fn hunks(old: &[u8], new: &[u8], matches: &[(usize, usize)], base: usize) -> EditScript {
    let mut script = EditScript::new();
    let (mut i, mut j) = (0, 0);

    let end = (old.len(), new.len());
    for &(mi, mj) in matches.iter().chain(std::iter::once(&end)) {
        if mi > i || mj > j {
            script.push(Delta::new(
                (base + j) as u64,
                (mi - i) as u64,
                Bytes::copy_from_slice(&new[j..mj]),
            ));
        }
        i = mi + 1;
        j = mj + 1;
    }

    script
}
