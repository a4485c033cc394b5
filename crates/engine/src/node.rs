// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow node: the unit of the composite state machine.
//!
//! A node is a record of common state (`name`, lifecycle state, settings,
//! highlight) plus a [`Kind`] tag carrying the behavior-specific data.
//! Operations dispatch over the closed kind enumeration; completions bubble
//! to the parent as returned [`NodeEvent`]s rather than stored callbacks,
//! so the tree stays an ownership hierarchy without reference cycles.

use crate::command::{Command, Location, Rgb};
use crate::composite::{Composite, Parallel};
use crate::delay::Delay;
use crate::error::DefinitionError;
use crate::puzzle::{Puzzle, PuzzlePolicy};
use op_core::message::State;
use op_core::{Effect, Graph, GraphEdge, GraphNode, NodeData, Topics, WorkflowState};
use serde_json::{Map, Value};

/// Event a node reports to its parent (or, at the root, to the controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    /// The node reached a terminal state. `skipped` distinguishes an
    /// operator skip from normal completion.
    Finished { name: String, skipped: bool },
    /// A non-fatal failure; the node stays in its current state and the
    /// session continues. Composites forward this unchanged.
    Failed { name: String, error: String },
}

impl NodeEvent {
    pub(crate) fn finished(name: &str, skipped: bool) -> Self {
        NodeEvent::Finished { name: name.to_string(), skipped }
    }

    pub(crate) fn failed(name: &str, error: impl Into<String>) -> Self {
        NodeEvent::Failed { name: name.to_string(), error: error.into() }
    }
}

/// State shared by every node kind.
#[derive(Debug, Clone)]
pub(crate) struct Base {
    pub(crate) name: String,
    pub(crate) state: WorkflowState,
    pub(crate) settings: Option<Map<String, Value>>,
    pub(crate) highlight: bool,
}

impl Base {
    fn new(name: impl Into<String>) -> Self {
        Base {
            name: name.into(),
            state: WorkflowState::Inactive,
            settings: None,
            highlight: false,
        }
    }

    /// Skip names match case-insensitively.
    pub(crate) fn matches(&self, target: &str) -> bool {
        self.name.eq_ignore_ascii_case(target)
    }

    /// Settings as trigger payload data: a single-entry map is flattened to
    /// its bare value, anything else is emitted as a JSON object.
    pub(crate) fn settings_data(&self) -> Value {
        match &self.settings {
            None => Value::Null,
            Some(map) if map.len() == 1 => {
                map.values().next().cloned().unwrap_or(Value::Null)
            }
            Some(map) => Value::Object(map.clone()),
        }
    }

    fn wrap_parent(&self) -> bool {
        self.settings
            .as_ref()
            .and_then(|s| s.get("wrap_parent"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Behavior tag of a node.
#[derive(Debug, Clone)]
pub(crate) enum Kind {
    Puzzle(Puzzle),
    Command(Command),
    Delay(Delay),
    Sequence(Composite),
    Parallel(Parallel),
    Combined(Composite),
}

impl Kind {
    fn type_name(&self) -> &'static str {
        match self {
            Kind::Puzzle(_) => "Puzzle",
            Kind::Command(c) => c.type_name(),
            Kind::Delay(_) => "Delay",
            Kind::Sequence(_) => "Sequence",
            Kind::Parallel(_) => "Parallel",
            Kind::Combined(_) => "Combined",
        }
    }

    fn topic(&self) -> Option<&str> {
        match self {
            Kind::Puzzle(p) => Some(p.topic()),
            Kind::Command(c) => Some(c.topic()),
            Kind::Delay(d) => Some(d.topic()),
            _ => None,
        }
    }
}

/// A unit in the composite workflow state machine.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) base: Base,
    pub(crate) kind: Kind,
}

impl Node {
    fn with_kind(name: impl Into<String>, kind: Kind) -> Self {
        Node { base: Base::new(name), kind }
    }

    // === Leaf constructors ===

    /// Standard puzzle leaf bound to one topic.
    pub fn puzzle(name: impl Into<String>, topic: impl Into<String>) -> Self {
        Node::with_kind(name, Kind::Puzzle(Puzzle::new(topic, PuzzlePolicy::Standard)))
    }

    /// Puzzle solved by unbalancing and re-balancing a scale: STATUS ACTIVE
    /// arms it, the following STATUS INACTIVE completes it silently.
    pub fn scale_puzzle(name: impl Into<String>, topic: impl Into<String>) -> Self {
        Node::with_kind(name, Kind::Puzzle(Puzzle::new(topic, PuzzlePolicy::Scale)))
    }

    /// Fire one trigger at a topic.
    pub fn send_trigger(name: impl Into<String>, topic: impl Into<String>, state: State) -> Self {
        Node::with_kind(name, Kind::Command(Command::trigger(topic, state, None)))
    }

    /// Fire one trigger carrying data.
    pub fn send_trigger_with_data(
        name: impl Into<String>,
        topic: impl Into<String>,
        state: State,
        data: Value,
    ) -> Self {
        Node::with_kind(name, Kind::Command(Command::trigger(topic, state, Some(data))))
    }

    /// Send one MESSAGE payload at a topic.
    pub fn send_message(
        name: impl Into<String>,
        topic: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Node::with_kind(name, Kind::Command(Command::message(topic, text)))
    }

    /// Speak a text over the audio system.
    pub fn tts(name: impl Into<String>, text: impl Into<String>) -> Self {
        Node::with_kind(name, Kind::Command(Command::audio(text, false)))
    }

    /// Play an audio file over the audio system.
    pub fn tts_file(name: impl Into<String>, file_location: impl Into<String>) -> Self {
        Node::with_kind(name, Kind::Command(Command::audio(file_location, true)))
    }

    /// Drive one LED strip: rgb, brightness, then power.
    pub fn single_light(
        name: impl Into<String>,
        topic: impl Into<String>,
        power: State,
        brightness: u8,
        color: Rgb,
    ) -> Self {
        Node::with_kind(name, Kind::Command(Command::light(topic, power, brightness, color)))
    }

    /// Operate every LED strip at a location as one atomic step.
    pub fn light_control(location: Location, power: State, brightness: u8, color: Rgb) -> Self {
        let children = location
            .strips()
            .iter()
            .map(|(name, topic)| Node::single_light(*name, *topic, power, brightness, color))
            .collect();
        let name = format!(
            "Turn {} {} lights {}/255",
            power.to_string().to_uppercase(),
            location,
            brightness
        );
        Node::with_kind(name, Kind::Combined(Composite::new(children)))
    }

    /// Park the sequence for `delay_secs` without blocking, using the game
    /// clock topic as a logical time source.
    pub fn delay(name: impl Into<String>, delay_secs: u64, topics: &Topics) -> Self {
        Node::with_kind(name, Kind::Delay(Delay::new(topics.game_time_in_sec(), delay_secs)))
    }

    // === Composite constructors ===

    /// Run children one after another.
    pub fn sequence(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::with_kind(name, Kind::Sequence(Composite::new(children)))
    }

    /// Run children concurrently; finished when every child is terminal.
    /// Duplicate child names are a construction error.
    pub fn parallel(name: impl Into<String>, children: Vec<Node>) -> Result<Self, DefinitionError> {
        let name = name.into();
        let parallel = Parallel::new(&name, children)?;
        Ok(Node::with_kind(name, Kind::Parallel(parallel)))
    }

    /// Sequence rendered as a single graph node.
    pub fn combined(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::with_kind(name, Kind::Combined(Composite::new(children)))
    }

    /// Named combined group for session setup tasks.
    pub fn init(children: Vec<Node>) -> Self {
        Node::combined("Init", children).wrapped()
    }

    /// Named combined group for session teardown tasks.
    pub fn exit(children: Vec<Node>) -> Self {
        Node::combined("Exit", children).wrapped()
    }

    // === Builders ===

    pub fn with_settings(mut self, settings: Map<String, Value>) -> Self {
        self.base.settings = Some(settings);
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.base.highlight = highlight;
        self
    }

    /// Default `wrap_parent` on without clobbering other settings.
    fn wrapped(mut self) -> Self {
        let settings = self.base.settings.get_or_insert_with(Map::new);
        settings.entry("wrap_parent").or_insert(Value::Bool(true));
        self
    }

    // === Accessors ===

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn state(&self) -> WorkflowState {
        self.base.state
    }

    /// Direct children, in declaration order (empty for leaves).
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            Kind::Sequence(c) | Kind::Combined(c) => &c.children,
            Kind::Parallel(p) => p.children(),
            _ => &[],
        }
    }

    // === Operations ===

    /// Transition from INACTIVE to ACTIVE and start the node's work. A node
    /// that was marked SKIPPED before ever running completes immediately
    /// without touching the bus.
    pub fn execute(&mut self, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        if self.base.state == WorkflowState::Skipped {
            return vec![NodeEvent::finished(&self.base.name, true)];
        }
        let Node { base, kind } = self;
        match kind {
            Kind::Puzzle(p) => p.execute(base, fx),
            Kind::Command(c) => c.execute(base, fx),
            Kind::Delay(d) => d.execute(base, fx),
            Kind::Sequence(c) | Kind::Combined(c) => c.execute(base, fx),
            Kind::Parallel(p) => p.execute(base, fx),
        }
    }

    /// Release bus subscriptions and return an ACTIVE node to INACTIVE.
    /// Suppressed entirely for SKIPPED nodes.
    pub fn dispose(&mut self, fx: &mut Vec<Effect>) {
        if self.base.state == WorkflowState::Skipped {
            return;
        }
        let active = self.base.state == WorkflowState::Active;
        match &mut self.kind {
            Kind::Puzzle(p) => p.dispose(fx),
            Kind::Command(_) => {}
            Kind::Delay(d) => d.dispose(fx),
            Kind::Sequence(c) | Kind::Combined(c) => c.dispose(active, fx),
            Kind::Parallel(p) => p.dispose(active, fx),
        }
        if self.base.state == WorkflowState::Active {
            self.base.state = WorkflowState::Inactive;
        }
    }

    /// Deliver a bus message. Composites route to their active children;
    /// leaves match the topic and advance their own state.
    pub fn on_message(&mut self, topic: &str, payload: &str, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        let Node { base, kind } = self;
        match kind {
            Kind::Puzzle(p) => p.on_message(base, topic, payload, fx),
            Kind::Command(_) => Vec::new(),
            Kind::Delay(d) => d.on_message(base, topic, payload),
            Kind::Sequence(c) | Kind::Combined(c) => c.on_message(base, topic, payload, fx),
            Kind::Parallel(p) => p.on_message(base, topic, payload, fx),
        }
    }

    /// Operator skip. A matching non-terminal node transitions to SKIPPED;
    /// composites cascade self-skips to children after a self match, or
    /// forward the original name to reach deeper descendants.
    pub fn skip(&mut self, target: &str, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        let Node { base, kind } = self;
        match kind {
            Kind::Puzzle(p) => p.skip(base, target, fx),
            // Single commands are atomic; nothing to skip.
            Kind::Command(_) => Vec::new(),
            Kind::Delay(d) => d.skip(base, target),
            Kind::Sequence(c) | Kind::Combined(c) => c.skip(base, target, fx),
            Kind::Parallel(p) => p.skip(base, target, fx),
        }
    }

    // === Graph export ===

    /// Render the full snapshot for the state topic.
    pub fn graph_config(&self) -> String {
        let (nodes, edges, _) = self.graph(&[], None);
        Graph::new(nodes, edges).to_json()
    }

    /// Emit this subtree's contribution to the graph. `predecessors` are the
    /// IDs whose final nodes feed edges into this subtree's entry; the
    /// returned finals are what downstream siblings connect from.
    pub fn graph(
        &self,
        predecessors: &[String],
        parent: Option<&str>,
    ) -> (Vec<GraphNode>, Vec<GraphEdge>, Vec<String>) {
        let name = self.base.name.clone();
        match &self.kind {
            Kind::Sequence(seq) => {
                let mut nodes = vec![self.graph_node(None, None, parent)];
                let mut edges = edges_from(predecessors, &name);
                let mut preds: Vec<String> = Vec::new();
                for child in &seq.children {
                    let (n, e, finals) = child.graph(&preds, Some(&name));
                    nodes.extend(n);
                    edges.extend(e);
                    preds = finals;
                }
                (nodes, edges, vec![name])
            }
            Kind::Parallel(par) => {
                let mut nodes = vec![self.graph_node(None, None, parent)];
                let mut edges = edges_from(predecessors, &name);
                for child in par.children() {
                    let (n, e, _) = child.graph(&[], Some(&name));
                    nodes.extend(n);
                    edges.extend(e);
                }
                (nodes, edges, vec![name])
            }
            Kind::Combined(_) => {
                let mut nodes = vec![self.graph_node(None, None, parent)];
                let edges = edges_from(predecessors, &name);
                if self.base.wrap_parent() {
                    let routines = format!("{name} routines");
                    nodes.push(self.graph_node(Some(&routines), Some(false), Some(&name)));
                }
                (nodes, edges, vec![name])
            }
            _ => {
                let nodes = vec![self.graph_node(None, None, parent)];
                let edges = edges_from(predecessors, &name);
                (nodes, edges, vec![name])
            }
        }
    }

    fn graph_node(
        &self,
        id_override: Option<&str>,
        highlight_override: Option<bool>,
        parent: Option<&str>,
    ) -> GraphNode {
        let id = id_override.unwrap_or(&self.base.name).to_string();
        let (message_state, message) = match &self.kind {
            Kind::Puzzle(p) => (p.last_status(), p.last_message().map(String::from)),
            _ => (None, None),
        };
        GraphNode {
            data: NodeData {
                name: id.clone(),
                id,
                highlight: highlight_override.unwrap_or(self.base.highlight),
                status: self.base.state,
                kind: self.kind.type_name().to_string(),
                topic: self.kind.topic().map(String::from),
                parent: parent.map(String::from),
                message_state,
                message,
            },
        }
    }
}

fn edges_from(predecessors: &[String], target: &str) -> Vec<GraphEdge> {
    predecessors.iter().map(|p| GraphEdge::link(p.clone(), target)).collect()
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
