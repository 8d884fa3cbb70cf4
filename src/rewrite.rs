//! Local rewriting of an AIG.
//!
//! A rewrite round is made of two passes, each followed by a canonicalization ([`Aig::optimize`]):
//! - a restructuring pass, looking for common factors between the two fanins of a gate
//!   (`(c & a) & (c & b)` becomes `c & (a & b)`), and optionally re-associating chains of gates
//! - a redundancy removal pass, which gets rid of gates such as `x & (x & y)` or `x & !x`.
//!
//! Rewriting never changes the function computed by the outputs.
//!
//! ```rust
//! use aigopt::{Aig, Literal};
//! let mut aig = Aig::new();
//! let a = Literal::new(aig.add_input(), false);
//! let b = Literal::new(aig.add_input(), false);
//! let c = Literal::new(aig.add_input(), false);
//! let ab = aig.add_and(a, b).unwrap();
//! let ac = aig.add_and(a, c).unwrap();
//! let g = aig.add_and(ab, ac).unwrap();
//! aig.add_output(g).unwrap();
//! assert_eq!(aig.gate_count(), 3);
//!
//! aig.rewrite().unwrap();
//! assert_eq!(aig.gate_count(), 2); // a & (b & c)
//! ```

use log::{debug, info, trace};

use crate::{Aig, FaninId, Literal, NodeId, Result};

/// Which restructuring rules are allowed to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteStrategy {
    /// Only common-factor extraction, and only when it is not expected to grow the AIG:
    /// the intermediate gates it frees must pay for the gates it creates.
    #[default]
    CostGated,
    /// Common-factor extraction and chain re-association, whenever their pattern matches.
    /// The AIG may grow.
    Unconditional,
}

/// Parameters of [`Aig::rewrite_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Number of rounds, there is no fixed-point detection.
    pub rounds: usize,
    /// Restructuring rules, the same for every round.
    pub strategy: RewriteStrategy,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            strategy: RewriteStrategy::default(),
        }
    }
}

impl RewriteConfig {
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_strategy(mut self, strategy: RewriteStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Result of matching the common-factor pattern on `x & y`.
struct CommonFactor {
    shared: Literal,
    rest_x: Literal,
    rest_y: Literal,
}

/// Looks for a fanin shared by `x` and `y`, both opened as plain gates.
fn find_common_factor(
    (xa, xb): (Literal, Literal),
    (ya, yb): (Literal, Literal),
) -> Option<CommonFactor> {
    [(xa, xb, ya, yb), (xa, xb, yb, ya), (xb, xa, ya, yb), (xb, xa, yb, ya)]
        .into_iter()
        .find(|&(x_shared, _, y_shared, _)| x_shared == y_shared)
        .map(|(shared, rest_x, _, rest_y)| CommonFactor {
            shared,
            rest_x,
            rest_y,
        })
}

impl Aig {
    /// Rewrites the AIG with the default [`RewriteConfig`].
    pub fn rewrite(&mut self) -> Result<()> {
        self.rewrite_with(&RewriteConfig::default())
    }

    /// Runs `config.rounds` rounds of: restructuring, canonicalization, redundancy removal,
    /// canonicalization.
    pub fn rewrite_with(&mut self, config: &RewriteConfig) -> Result<()> {
        debug!("rewrite: starting with {:?}, {}", config, self.metrics());

        for round in 1..=config.rounds {
            let restructured = self.restructure(config.strategy)?;
            self.optimize()?;
            let removed = self.remove_redundancy()?;
            self.optimize()?;

            debug!(
                "rewrite round {}: {} gates restructured, {} redundant gates removed",
                round, restructured, removed
            );
            info!(
                "rewrite round {}/{}: {}",
                round,
                config.rounds,
                self.metrics()
            );
        }

        Ok(())
    }

    /// Restructuring pass, returns the number of rewritten gates.
    ///
    /// A rewritten gate keeps its id but gets `(new, TRUE)` as fanins, where `new` is the
    /// restructured version of the gate: gates using it are still correct until the next
    /// canonicalization removes the indirection. Only gates existing at the start of the pass
    /// are visited.
    ///
    /// The strash entry of a rewritten gate still points to it under its old fanins, so building
    /// a gate may hand it back. Such a result is rejected, as is the current gate itself: both
    /// could close a cycle.
    fn restructure(&mut self, strategy: RewriteStrategy) -> Result<usize> {
        let refs = self.reference_counts();
        let node_count = self.node_count();
        let mut rewritten = vec![false; node_count];
        let mut count = 0;

        for id in 1..node_count as NodeId {
            let Some((x, y)) = self.fanins(Literal::new(id, false)) else {
                continue;
            };
            let excluded = Excluded {
                current: id,
                rewritten: &rewritten,
            };

            let new = match strategy {
                RewriteStrategy::CostGated => {
                    self.extract_common_factor(x, y, Some(refs.as_slice()), &excluded)?
                }
                RewriteStrategy::Unconditional => {
                    match self.extract_common_factor(x, y, None, &excluded)? {
                        Some(new) => Some(new),
                        None => self.reassociate(x, y, &excluded)?,
                    }
                }
            };

            if let Some(new) = new {
                trace!("restructure: gate {} = ({}, {}) -> {}", id, x, y, new);
                self.replace_fanin(id, FaninId::Fanin0, new);
                self.replace_fanin(id, FaninId::Fanin1, Literal::TRUE);
                rewritten[id as usize] = true;
                count += 1;
            }
        }

        Ok(count)
    }

    /// `(c & a) & (c & b)` becomes `c & (a & b)`.
    ///
    /// With reference counts, it only fires if the number of gates which become unused is at
    /// least the number of gates to create. Only the first shared fanin found is considered.
    fn extract_common_factor(
        &mut self,
        x: Literal,
        y: Literal,
        refs: Option<&[u32]>,
        excluded: &Excluded,
    ) -> Result<Option<Literal>> {
        // Inverted gates are not conjunctions of their fanins
        let (Some(x_fanins), Some(y_fanins)) = (self.fanins(x), self.fanins(y)) else {
            return Ok(None);
        };
        let Some(factor) = find_common_factor(x_fanins, y_fanins) else {
            return Ok(None);
        };

        if let Some(refs) = refs {
            let gain = [x, y]
                .iter()
                .filter(|lit| refs[lit.index()] == 1)
                .count();
            let cost = 1 + self.find_and(factor.rest_x, factor.rest_y).is_none() as usize;
            if gain < cost {
                return Ok(None);
            }
        }

        let rest = self.add_and(factor.rest_x, factor.rest_y)?;
        if excluded.contains(rest) {
            trace!("restructure: common factor rejected, {} is excluded", rest);
            return Ok(None);
        }
        let new = self.add_and(factor.shared, rest)?;
        if excluded.contains(new) {
            trace!("restructure: common factor rejected, {} is excluded", new);
            return Ok(None);
        }
        Ok(Some(new))
    }

    /// `(a & b) & y` becomes `a & (b & y)`, `x & (a & b)` is read as `(a & b) & x`.
    fn reassociate(
        &mut self,
        x: Literal,
        y: Literal,
        excluded: &Excluded,
    ) -> Result<Option<Literal>> {
        for (x, y) in [(x, y), (y, x)] {
            let Some((a, b)) = self.fanins(x) else {
                continue;
            };
            if a == y || b == y {
                continue;
            }

            let rest = self.add_and(b, y)?;
            if excluded.contains(rest) {
                continue;
            }
            let new = self.add_and(a, rest)?;
            if excluded.contains(new) {
                continue;
            }
            return Ok(Some(new));
        }
        Ok(None)
    }

    /// Redundancy removal pass, returns the number of removed gates.
    ///
    /// Every gate is first matched against the rules (in this order):
    /// - `x & !x` is `FALSE`
    /// - `x & (x & y)` is `x & y`, and `!x & (x & y)` is `FALSE`
    /// - `x & x` is `x`.
    ///
    /// Fanins are matched through the replacements found so far. Then all fanins and outputs
    /// referring to a removed gate are redirected to its replacement.
    fn remove_redundancy(&mut self) -> Result<usize> {
        let node_count = self.node_count();
        let mut replacements: Vec<Option<Literal>> = vec![None; node_count];
        let mut removed = 0;

        for id in 1..node_count as NodeId {
            let Some((f0, f1)) = self.fanins(Literal::new(id, false)) else {
                continue;
            };
            // Fanins come first, their own replacements are final
            let (f0, f1) = (resolve(&replacements, f0), resolve(&replacements, f1));

            if let Some(lit) = self.redundant_gate(f0, f1) {
                trace!("remove redundancy: gate {} = ({}, {}) -> {}", id, f0, f1, lit);
                replacements[id as usize] = Some(lit);
                removed += 1;
            }
        }

        if removed == 0 {
            return Ok(0);
        }

        for id in 1..node_count as NodeId {
            let Some((f0, f1)) = self.fanins(Literal::new(id, false)) else {
                continue;
            };
            for (fanin_id, lit) in [(FaninId::Fanin0, f0), (FaninId::Fanin1, f1)] {
                let new = resolve(&replacements, lit);
                if new != lit {
                    self.replace_fanin(id, fanin_id, new);
                }
            }
        }
        for index in 0..self.outputs().len() {
            let output = self.outputs()[index];
            self.replace_output(index, resolve(&replacements, output));
        }

        Ok(removed)
    }

    /// The literal an `f0 & f1` gate reduces to, if any.
    fn redundant_gate(&self, f0: Literal, f1: Literal) -> Option<Literal> {
        if f0.is_complement_of(f1) {
            return Some(Literal::FALSE);
        }

        for (x, y) in [(f0, f1), (f1, f0)] {
            if let Some((xa, xb)) = self.fanins(x) {
                if xa == y || xb == y {
                    return Some(x);
                }
                if xa.is_complement_of(y) || xb.is_complement_of(y) {
                    return Some(Literal::FALSE);
                }
            }
        }

        (f0 == f1).then_some(f0)
    }
}

/// Nodes a restructured gate must not be built on.
struct Excluded<'a> {
    current: NodeId,
    /// Gates rewritten earlier in the pass, their strash entries are stale.
    rewritten: &'a [bool],
}

impl Excluded<'_> {
    fn contains(&self, lit: Literal) -> bool {
        // Gates created during the pass are never rewritten
        lit.node_id() == self.current
            || self.rewritten.get(lit.index()).copied().unwrap_or(false)
    }
}

/// Follows the replacement of the node of `lit`, keeping its polarity.
fn resolve(replacements: &[Option<Literal>], lit: Literal) -> Literal {
    match replacements[lit.index()] {
        Some(new) => new ^ lit.is_inverted(),
        None => lit,
    }
}

#[cfg(test)]
mod test {
    use std::io::BufReader;

    use rand::{Rng, SeedableRng, rngs::StdRng};
    use test_log::test;

    use super::*;

    fn with_inputs(n: usize) -> (Aig, Vec<Literal>) {
        let mut aig = Aig::new();
        let lits = (0..n)
            .map(|_| Literal::new(aig.add_input(), false))
            .collect();
        (aig, lits)
    }

    fn unconditional() -> RewriteConfig {
        RewriteConfig::default().with_strategy(RewriteStrategy::Unconditional)
    }

    /// Rewrites a copy, checks it computes the same functions and returns it.
    fn check_rewrite(aig: &Aig, config: &RewriteConfig) -> Aig {
        let mut rewritten = aig.clone();
        let result = rewritten.rewrite_with(config);
        assert!(
            result.is_ok(),
            "{:?} with {:?} on\n{}",
            result,
            config,
            aig.to_ascii().unwrap()
        );
        assert!(rewritten.check_integrity().is_ok());
        assert_eq!(rewritten.inputs().len(), aig.inputs().len());
        assert_eq!(rewritten.outputs().len(), aig.outputs().len());
        assert_eq!(
            rewritten.truth_tables().unwrap(),
            aig.truth_tables().unwrap()
        );
        rewritten
    }

    /// Mostly among the last few literals, so that cones reconverge and share fanins.
    fn pick_fanin(rng: &mut StdRng, lits: &[Literal]) -> Literal {
        let start = if rng.gen_bool(0.7) {
            lits.len().saturating_sub(6)
        } else {
            0
        };
        lits[rng.gen_range(start..lits.len())] ^ rng.gen_bool(0.5)
    }

    fn random_aig(rng: &mut StdRng) -> Aig {
        let (mut aig, mut lits) = with_inputs(rng.gen_range(2..=7));
        lits.push(Literal::FALSE);
        for _ in 0..rng.gen_range(1..40) {
            let lit0 = pick_fanin(rng, &lits);
            let lit1 = pick_fanin(rng, &lits);
            let lit = aig.add_and(lit0, lit1).unwrap();
            lits.push(lit);
        }
        for _ in 0..rng.gen_range(1..5) {
            // Outputs are taken among the most recent literals, to get deep cones
            let index = rng.gen_range(lits.len() / 2..lits.len());
            let output = lits[index] ^ rng.gen_bool(0.5);
            aig.add_output(output).unwrap();
        }
        aig
    }

    #[test]
    fn default_config() {
        let config = RewriteConfig::default();
        assert_eq!(config.rounds, 3);
        assert_eq!(config.strategy, RewriteStrategy::CostGated);
        assert_eq!(config.with_rounds(5).rounds, 5);
    }

    #[test]
    fn common_factor_is_extracted() {
        let (mut aig, lits) = with_inputs(3);
        let x = aig.add_and(lits[0], lits[1]).unwrap();
        let y = aig.add_and(lits[0], lits[2]).unwrap();
        let g = aig.add_and(x, y).unwrap();
        aig.add_output(g).unwrap();

        for config in [RewriteConfig::default(), unconditional()] {
            let rewritten = check_rewrite(&aig, &config);
            assert_eq!(rewritten.gate_count(), 2);
            assert_eq!(rewritten.depth(), 2);
        }
    }

    #[test]
    fn common_factor_on_second_fanins() {
        let (mut aig, lits) = with_inputs(3);
        let x = aig.add_and(lits[0], !lits[2]).unwrap();
        let y = aig.add_and(lits[1], !lits[2]).unwrap();
        let g = aig.add_and(x, y).unwrap();
        aig.add_output(!g).unwrap();

        let rewritten = check_rewrite(&aig, &RewriteConfig::default());
        assert_eq!(rewritten.gate_count(), 2);
    }

    #[test]
    fn shared_factor_is_not_worth_it() {
        let (mut aig, lits) = with_inputs(3);
        let x = aig.add_and(lits[0], lits[1]).unwrap();
        let y = aig.add_and(lits[0], lits[2]).unwrap();
        let g = aig.add_and(x, y).unwrap();
        aig.add_output(g).unwrap();
        // x stays alive anyway
        aig.add_output(x).unwrap();

        let rewritten = check_rewrite(&aig, &RewriteConfig::default());
        assert_eq!(rewritten.gate_count(), 3);
        assert_eq!(rewritten, {
            let mut canonical = aig.clone();
            canonical.optimize().unwrap();
            canonical
        });

        // Not gated: rewritten anyway, y is freed but b & c is new
        let rewritten = check_rewrite(&aig, &unconditional());
        assert_eq!(rewritten.gate_count(), 3);
    }

    #[test]
    fn existing_gate_makes_it_worth_it() {
        let (mut aig, lits) = with_inputs(3);
        let x = aig.add_and(lits[0], lits[1]).unwrap();
        let y = aig.add_and(lits[0], lits[2]).unwrap();
        let g = aig.add_and(x, y).unwrap();
        let bc = aig.add_and(lits[1], lits[2]).unwrap();
        aig.add_output(g).unwrap();
        aig.add_output(x).unwrap();
        aig.add_output(bc).unwrap();

        // Only a & bc is created, and y goes away
        let rewritten = check_rewrite(&aig, &RewriteConfig::default());
        assert_eq!(rewritten.gate_count(), 3);
        let bc = rewritten.outputs()[2];
        let (f0, f1) = rewritten.fanins(rewritten.outputs()[0]).unwrap();
        assert!(f0 == bc || f1 == bc);
    }

    #[test]
    fn inverted_fanins_are_not_opened() {
        // !(a & b) & !(a & c) is not a & ...
        let (mut aig, lits) = with_inputs(3);
        let x = aig.add_and(lits[0], lits[1]).unwrap();
        let y = aig.add_and(lits[0], lits[2]).unwrap();
        let g = aig.add_and(!x, !y).unwrap();
        aig.add_output(g).unwrap();

        for config in [RewriteConfig::default(), unconditional()] {
            let rewritten = check_rewrite(&aig, &config);
            assert_eq!(rewritten.gate_count(), 3);
        }
    }

    #[test]
    fn chain_is_reassociated() {
        let (mut aig, lits) = with_inputs(3);
        let x = aig.add_and(lits[0], lits[1]).unwrap();
        let g = aig.add_and(x, lits[2]).unwrap();
        aig.add_output(g).unwrap();

        // Nothing to gain, only the unconditional strategy moves things around
        let rewritten = check_rewrite(&aig, &RewriteConfig::default().with_rounds(1));
        assert_eq!(rewritten.fanins(rewritten.outputs()[0]), aig.fanins(g));

        let rewritten = check_rewrite(&aig, &unconditional().with_rounds(1));
        assert_eq!(rewritten.gate_count(), 2);
        assert_ne!(rewritten.fanins(rewritten.outputs()[0]), aig.fanins(g));
    }

    #[test]
    fn absorption() {
        let (mut aig, lits) = with_inputs(2);
        let x = aig.add_and(lits[0], lits[1]).unwrap();
        let g = aig.add_and(x, lits[0]).unwrap();
        let h = aig.add_and(!lits[1], x).unwrap();
        aig.add_output(g).unwrap();
        aig.add_output(!h).unwrap();

        let rewritten = check_rewrite(&aig, &RewriteConfig::default());
        assert_eq!(rewritten.gate_count(), 1);
        assert_eq!(
            rewritten.outputs(),
            &[Literal::new(3, false), Literal::TRUE]
        );
    }

    #[test]
    fn absorption_through_gates() {
        // The gate absorbed is itself redundant
        let (mut aig, lits) = with_inputs(3);
        let x = aig.add_and(lits[0], lits[1]).unwrap();
        let y = aig.add_and(x, lits[0]).unwrap();
        let z = aig.add_and(y, lits[1]).unwrap();
        let top = aig.add_and(z, lits[2]).unwrap();
        aig.add_output(top).unwrap();
        aig.add_output(!z).unwrap();

        let rewritten = check_rewrite(&aig, &RewriteConfig::default().with_rounds(1));
        assert_eq!(rewritten.gate_count(), 2);
    }

    #[test]
    fn zero_rounds() {
        let (mut aig, lits) = with_inputs(2);
        let x = aig.add_and(lits[0], lits[1]).unwrap();
        let _dead = aig.add_and(!lits[0], lits[1]).unwrap();
        aig.add_output(x).unwrap();

        let before = aig.clone();
        aig.rewrite_with(&RewriteConfig::default().with_rounds(0))
            .unwrap();
        assert_eq!(aig, before);
    }

    #[test]
    fn fixtures_are_preserved() {
        for path in [
            "assets/circuits/nand.aag",
            "assets/circuits/half-adder.aag",
            "assets/circuits/full-adder.aag",
            "assets/circuits/mux.aag",
            "assets/circuits/redundant.aag",
            "assets/circuits/toggle.aag",
        ] {
            let aig = Aig::from_file(path).unwrap();
            let rewritten = check_rewrite(&aig, &RewriteConfig::default());
            assert!(rewritten.gate_count() <= aig.gate_count(), "{}", path);
            check_rewrite(&aig, &unconditional());
        }
    }

    #[test]
    fn redundant_fixture_shrinks() {
        let aig = Aig::from_file("assets/circuits/redundant.aag").unwrap();
        assert_eq!(aig.gate_count(), 4);
        let rewritten = check_rewrite(&aig, &RewriteConfig::default());
        assert_eq!(rewritten.gate_count(), 3);
        assert_eq!(rewritten.outputs()[2], Literal::TRUE);
    }

    #[test]
    fn stale_strash_entries_do_not_close_cycles() {
        // Gate 5 becomes gate 8, then re-associating gate 8 builds a & g4, which is still
        // gate 5 in the strash
        let aig = Aig::from_ascii(BufReader::new(
            "aag 9 2 0 1 7\n2\n4\n18\n6 5 2\n8 7 5\n10 8 2\n12 10 5\n14 7 2\n16 14 5\n18 16 13\n"
                .as_bytes(),
        ))
        .unwrap();

        for config in [
            unconditional().with_rounds(1),
            unconditional(),
            RewriteConfig::default(),
        ] {
            let rewritten = check_rewrite(&aig, &config);
            assert!(rewritten.gate_count() <= aig.gate_count() + 2);
        }
    }

    #[test]
    fn reassociation_skips_rewritten_gates() {
        // g is re-associated first, then h = (a & b) & c would be rebuilt as a & (b & c), ie g
        let (mut aig, lits) = with_inputs(3);
        let bc = aig.add_and(lits[1], lits[2]).unwrap();
        let ab = aig.add_and(lits[0], lits[1]).unwrap();
        let g = aig.add_and(lits[0], bc).unwrap();
        let h = aig.add_and(ab, lits[2]).unwrap();
        aig.add_output(g).unwrap();
        aig.add_output(h).unwrap();

        for rounds in 1..=3 {
            check_rewrite(&aig, &unconditional().with_rounds(rounds));
        }
    }

    #[test]
    fn rewrite_is_sound_on_random_aigs() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..3000 {
            let aig = random_aig(&mut rng);
            check_rewrite(&aig, &RewriteConfig::default());
            check_rewrite(&aig, &unconditional());
            check_rewrite(&aig, &unconditional().with_rounds(1));
        }
    }
}
