//! ワークリストドライバ
//!
//! 単一スレッドでファクトを一つずつ取り出し、該当する規則群を適用し、
//! 本当に新しい帰結だけを挿入して再投入する。キューが空になった時点で
//! 飽和は完了。Bottom の逆伝播は規則ループとは独立の明示的スタック
//! 走査で行う。

use crate::index::AxiomIndex;
use crate::nodes::{ExistentialMarker, WitnessNode};
use crate::rules::{link_rules, subsumption_rules, CompletionRule, Fact, MarkerRole, Proposal};
use crate::status::ClassifierStatus;
use mimizuku_core::{ClassId, ClassifierError, Expressivity, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Cooperative cancellation handle. The driver checks it between worklist
/// pops; an interrupted run reports `ClassifierError::Interrupted` and
/// never a partial classification.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Engine configuration, computed or chosen once before the run.
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfig {
    /// Record per-rule invocation counts and elapsed time.
    pub instrument: bool,
    /// Upper bound on the witness table; exceeding it is treated as a
    /// broken canonicalization invariant, not as a big ontology.
    pub node_budget: Option<usize>,
    /// Cancellation handle shared with the caller.
    pub interrupt: Option<Interrupt>,
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrumentation(mut self, instrument: bool) -> Self {
        self.instrument = instrument;
        self
    }

    pub fn with_node_budget(mut self, budget: usize) -> Self {
        self.node_budget = Some(budget);
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }
}

/// Per-rule counters reported by the instrumentation wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleStats {
    pub name: String,
    pub invocations: u64,
    pub proposals: u64,
    pub elapsed_nanos: u64,
}

/// Aggregate counters for one saturation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaturationStats {
    pub subsumption_facts: u64,
    pub link_facts: u64,
    pub nodes: usize,
    pub witnesses: usize,
    pub rules: Vec<RuleStats>,
}

/// Transparent observer around a rule: counts invocations and proposals
/// and accumulates elapsed time when enabled, delegates otherwise.
pub struct InstrumentedRule {
    inner: Box<dyn CompletionRule>,
    enabled: bool,
    invocations: AtomicU64,
    proposals: AtomicU64,
    nanos: AtomicU64,
}

impl InstrumentedRule {
    pub fn new(inner: Box<dyn CompletionRule>, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            invocations: AtomicU64::new(0),
            proposals: AtomicU64::new(0),
            nanos: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> RuleStats {
        RuleStats {
            name: self.inner.name().to_string(),
            invocations: self.invocations.load(Ordering::Relaxed),
            proposals: self.proposals.load(Ordering::Relaxed),
            elapsed_nanos: self.nanos.load(Ordering::Relaxed),
        }
    }
}

impl CompletionRule for InstrumentedRule {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn apply(&self, status: &ClassifierStatus, index: &AxiomIndex, fact: &Fact) -> Vec<Proposal> {
        if !self.enabled {
            return self.inner.apply(status, index, fact);
        }
        let start = Instant::now();
        let proposals = self.inner.apply(status, index, fact);
        self.invocations.fetch_add(1, Ordering::Relaxed);
        self.proposals.fetch_add(proposals.len() as u64, Ordering::Relaxed);
        self.nanos.fetch_add(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
        proposals
    }
}

/// The worklist driver. Owns the status exclusively for the duration of
/// the run; rules only ever see shared borrows.
pub struct Saturator<'a> {
    index: &'a AxiomIndex,
    status: ClassifierStatus,
    s_rules: Vec<InstrumentedRule>,
    r_rules: Vec<InstrumentedRule>,
    reflexive: Vec<RoleId>,
    todo: Vec<Fact>,
    subsumption_facts: u64,
    link_facts: u64,
    config: &'a ClassifierConfig,
}

impl<'a> Saturator<'a> {
    pub fn new(
        index: &'a AxiomIndex,
        status: ClassifierStatus,
        expressivity: &Expressivity,
        config: &'a ClassifierConfig,
    ) -> Self {
        let wrap = |rules: Vec<Box<dyn CompletionRule>>| {
            rules
                .into_iter()
                .map(|rule| InstrumentedRule::new(rule, config.instrument))
                .collect()
        };
        Self {
            index,
            status,
            s_rules: wrap(subsumption_rules(expressivity)),
            r_rules: wrap(link_rules(expressivity)),
            reflexive: index.reflexive_roles().collect(),
            todo: Vec::new(),
            subsumption_facts: 0,
            link_facts: 0,
            config,
        }
    }

    /// Runs the rules to fixpoint from the given seed nodes and returns
    /// the frozen status plus counters.
    pub fn run(
        mut self,
        seeds: &[ClassId],
    ) -> Result<(ClassifierStatus, SaturationStats), ClassifierError> {
        for x in seeds {
            self.register_node(*x);
        }
        while let Some(fact) = self.todo.pop() {
            if let Some(interrupt) = &self.config.interrupt {
                if interrupt.is_interrupted() {
                    return Err(ClassifierError::Interrupted);
                }
            }
            let proposals: Vec<Proposal> = {
                let rules = match &fact {
                    Fact::Subsumption { .. } => &self.s_rules,
                    Fact::Link { .. } => &self.r_rules,
                };
                rules
                    .iter()
                    .flat_map(|rule| rule.apply(&self.status, self.index, &fact))
                    .collect()
            };
            for proposal in proposals {
                self.materialize(proposal)?;
            }
        }
        debug!(
            subsumptions = self.subsumption_facts,
            links = self.link_facts,
            nodes = self.status.node_count(),
            witnesses = self.status.witness_count(),
            "saturation reached its fixpoint"
        );
        let stats = SaturationStats {
            subsumption_facts: self.subsumption_facts,
            link_facts: self.link_facts,
            nodes: self.status.node_count(),
            witnesses: self.status.witness_count(),
            rules: if self.config.instrument {
                self.s_rules.iter().chain(self.r_rules.iter()).map(|r| r.stats()).collect()
            } else {
                Vec::new()
            },
        };
        Ok((self.status, stats))
    }

    /// Registers x as a node: (x,x) and (x,Top) become ordinary facts so
    /// the rules see them, and declared reflexive roles get their
    /// self-links.
    fn register_node(&mut self, x: ClassId) {
        if self.status.ensure_node(x) {
            self.insert_subsumption(x, x);
            self.insert_subsumption(x, ClassId::TOP);
            for i in 0..self.reflexive.len() {
                let role = self.reflexive[i];
                self.insert_link(role, x, x);
            }
        }
    }

    fn insert_subsumption(&mut self, node: ClassId, class: ClassId) {
        self.register_node(node);
        self.register_node(class);
        if self.status.add_subsumer(node, class) {
            self.subsumption_facts += 1;
            trace!(%node, %class, "new subsumption fact");
            self.todo.push(Fact::Subsumption { node, class });
            if class.is_bottom() {
                self.propagate_bottom(node);
            }
        }
    }

    fn insert_link(&mut self, role: RoleId, source: ClassId, target: ClassId) {
        self.register_node(source);
        self.register_node(target);
        if self.status.add_role_successor(role, source, target) {
            self.link_facts += 1;
            trace!(%role, %source, %target, "new role-successor fact");
            self.todo.push(Fact::Link { role, source, target });
            // a link into an already-unsatisfiable node dooms the source
            if self.status.has_subsumer(target, ClassId::BOTTOM) {
                self.insert_subsumption(source, ClassId::BOTTOM);
            }
        }
    }

    /// Backward Bottom propagation over R-predecessors, all roles.
    /// Iterative on purpose: successor chains can be deep.
    fn propagate_bottom(&mut self, start: ClassId) {
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            let predecessors: Vec<(RoleId, ClassId)> = self.status.predecessors_of(node).to_vec();
            for (_, predecessor) in predecessors {
                if self.status.add_subsumer(predecessor, ClassId::BOTTOM) {
                    self.subsumption_facts += 1;
                    self.todo.push(Fact::Subsumption {
                        node: predecessor,
                        class: ClassId::BOTTOM,
                    });
                    stack.push(predecessor);
                }
            }
        }
    }

    fn materialize(&mut self, proposal: Proposal) -> Result<(), ClassifierError> {
        match proposal {
            Proposal::Subsumption { node, class } => {
                self.insert_subsumption(node, class);
            }
            Proposal::Link { role, source, target } => {
                self.insert_link(role, source, target);
            }
            Proposal::ExistentialWitness { source, role, filler } => {
                let witness = self.intern_checked(WitnessNode::existential(filler))?;
                self.register_node(witness);
                self.insert_link(role, source, witness);
                self.insert_subsumption(witness, filler);
            }
            Proposal::FunctionalWitness { source, role, filler, existing } => {
                let mut markers =
                    existing.map(|y| self.status.markers_of(y)).unwrap_or_default();
                markers.insert(ExistentialMarker { role, filler });
                let witness = self.intern_checked(WitnessNode::top_rooted(markers))?;
                self.register_node(witness);
                if let Some(previous) = existing {
                    self.copy_subsumers(previous, witness);
                }
                self.insert_link(role, source, witness);
                self.insert_subsumption(witness, filler);
            }
            Proposal::MergeWitness {
                source,
                role,
                target,
                marker_role,
                marker_filler,
                subsumer,
            } => {
                let marker_role = match marker_role {
                    MarkerRole::InverseOf(r) => self.status.inverse_of(r),
                    MarkerRole::Role(t) => t,
                };
                let base = self.status.base_of(target);
                let mut markers = self.status.markers_of(target);
                markers.insert(ExistentialMarker { role: marker_role, filler: marker_filler });
                let witness = self.intern_checked(WitnessNode { base, markers })?;
                self.register_node(witness);
                self.copy_subsumers(target, witness);
                self.insert_subsumption(witness, subsumer);
                self.insert_link(role, source, witness);
            }
            Proposal::UnifyWitnesses { source, links } => {
                let mut markers = BTreeSet::new();
                for (_, target) in &links {
                    markers.extend(self.status.markers_of(*target));
                }
                let witness = self.intern_checked(WitnessNode::top_rooted(markers))?;
                self.register_node(witness);
                for (role, target) in links {
                    self.copy_subsumers(target, witness);
                    self.insert_link(role, source, witness);
                }
            }
        }
        Ok(())
    }

    /// Copies the current subsumers of `from` onto `to` ("current" is
    /// deliberate: later arrivals on `from` are not forwarded).
    fn copy_subsumers(&mut self, from: ClassId, to: ClassId) {
        if from == to {
            return;
        }
        let subsumers: Vec<ClassId> = self.status.subsumers(from).collect();
        for class in subsumers {
            self.insert_subsumption(to, class);
        }
    }

    fn intern_checked(&mut self, node: WitnessNode) -> Result<ClassId, ClassifierError> {
        let (id, new) = self.status.intern_node(node);
        if !self.status.pool().is_synthetic_class(id) {
            return Err(ClassifierError::Internal(format!(
                "witness interned into the declared id range as {id}"
            )));
        }
        if new {
            if let Some(budget) = self.config.node_budget {
                if self.status.witness_count() > budget {
                    return Err(ClassifierError::Internal(format!(
                        "witness table exceeded the configured budget of {budget} nodes"
                    )));
                }
            }
        }
        Ok(id)
    }
}
