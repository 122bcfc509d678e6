//! Transient world-transform resolution for one evaluation.
//!
//! World matrices are resolved over the whole node graph, not only over bone
//! nodes, because a bone's ancestors may be animated non-bone nodes (an
//! armature root being moved, say). Resolution is memoized per node with a
//! tri-state visit marker; all of it is reset at the start of every update.
//!
//! Chains are walked with an explicit stack instead of recursion, so deep
//! or malformed hierarchies cannot overflow the call stack. A chain that
//! loops back onto itself gets identity at the point where the loop closes.

use std::mem;

use glam::{Affine3A, Mat4};
use skinrig_animation::AnimationClip;
use skinrig_core::NodeId;
use skinrig_scene::{Bone, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Read-only inputs of one evaluation.
pub(crate) struct PoseInput<'a> {
    pub nodes: &'a [Node],
    pub bones: &'a [Bone],
    pub clip: &'a AnimationClip,
    pub time: f32,
}

/// Scratch buffers reused between updates. Contents never carry over: every
/// evaluation starts from [`PoseScratch::reset`].
#[derive(Debug, Default)]
pub(crate) struct PoseScratch {
    node_local: Vec<Option<Affine3A>>,
    node_marks: Vec<Visit>,
    node_world: Vec<Affine3A>,
    node_stack: Vec<usize>,

    bone_local: Vec<Affine3A>,
    bone_marks: Vec<Visit>,
    bone_world: Vec<Affine3A>,
    bone_stack: Vec<usize>,

    cycles_broken: u32,
}

impl PoseScratch {
    fn reset(&mut self, node_count: usize, bone_count: usize) {
        self.node_local.clear();
        self.node_local.resize(node_count, None);
        self.node_marks.clear();
        self.node_marks.resize(node_count, Visit::Unvisited);
        self.node_world.clear();
        self.node_world.resize(node_count, Affine3A::IDENTITY);

        self.bone_local.clear();
        self.bone_local.resize(bone_count, Affine3A::IDENTITY);
        self.bone_marks.clear();
        self.bone_marks.resize(bone_count, Visit::Unvisited);
        self.bone_world.clear();
        self.bone_world.resize(bone_count, Affine3A::IDENTITY);

        self.cycles_broken = 0;
    }

    /// Evaluates every bone and writes skin matrices into `palette`, which
    /// must be `input.bones.len()` long. Returns how many cycle breaks were
    /// needed.
    pub(crate) fn evaluate(&mut self, input: &PoseInput<'_>, palette: &mut [Mat4]) -> u32 {
        let bone_count = input.bones.len();
        self.reset(input.nodes.len(), bone_count);

        for (index, bone) in input.bones.iter().enumerate() {
            self.bone_local[index] = match bone.node {
                Some(node) if node.index() < input.nodes.len() => {
                    self.node_local(input, node.index())
                }
                _ => Affine3A::IDENTITY,
            };
        }

        for (index, (bone, slot)) in input.bones.iter().zip(palette.iter_mut()).enumerate() {
            let world = self.bone_world(input, index);
            *slot = Mat4::from(world) * bone.inverse_bind;
        }

        self.cycles_broken
    }

    /// Freshly sampled local transform of `node`, bind pose for untracked
    /// channels.
    fn node_local(&mut self, input: &PoseInput<'_>, node: usize) -> Affine3A {
        if let Some(local) = self.node_local[node] {
            return local;
        }
        let rest = &input.nodes[node].bind;
        let local = input
            .clip
            .sample_node(NodeId::from(node), input.time, rest)
            .to_affine();
        self.node_local[node] = Some(local);
        local
    }

    /// Animated world matrix of `node`.
    fn node_world(&mut self, input: &PoseInput<'_>, node: usize) -> Affine3A {
        let count = input.nodes.len();
        let mut stack = mem::take(&mut self.node_stack);
        stack.clear();

        let mut current = Some(node);
        let mut world = loop {
            // Missing or out-of-range parent: the chain ends at a root.
            let Some(index) = current.filter(|&i| i < count) else {
                break Affine3A::IDENTITY;
            };
            match self.node_marks[index] {
                Visit::Done => break self.node_world[index],
                Visit::InProgress => {
                    self.cycles_broken += 1;
                    break Affine3A::IDENTITY;
                }
                Visit::Unvisited => {
                    self.node_marks[index] = Visit::InProgress;
                    stack.push(index);
                    current = input.nodes[index].parent().map(NodeId::index);
                }
            }
        };

        while let Some(index) = stack.pop() {
            world = world * self.node_local(input, index);
            self.node_world[index] = world;
            self.node_marks[index] = Visit::Done;
        }

        self.node_stack = stack;
        world
    }

    /// World matrix of the node-graph parent of a bone's node, the base a
    /// root bone composes onto.
    fn node_parent_world(&mut self, input: &PoseInput<'_>, node: Option<NodeId>) -> Affine3A {
        let parent = node
            .and_then(|id| input.nodes.get(id.index()))
            .and_then(Node::parent);
        match parent {
            Some(parent) => self.node_world(input, parent.index()),
            None => Affine3A::IDENTITY,
        }
    }

    /// World matrix of bone `bone`: `parent_bone_world * local` when it has a
    /// valid parent bone, otherwise `node_parent_world * local`.
    fn bone_world(&mut self, input: &PoseInput<'_>, bone: usize) -> Affine3A {
        let count = input.bones.len();
        let mut stack = mem::take(&mut self.bone_stack);
        stack.clear();

        let mut index = bone;
        let mut world = loop {
            match self.bone_marks[index] {
                Visit::Done => break self.bone_world[index],
                Visit::InProgress => {
                    self.cycles_broken += 1;
                    break Affine3A::IDENTITY;
                }
                Visit::Unvisited => {
                    self.bone_marks[index] = Visit::InProgress;
                    stack.push(index);
                    match input.bones[index].parent.filter(|&p| p < count) {
                        Some(parent) => index = parent,
                        None => break self.node_parent_world(input, input.bones[index].node),
                    }
                }
            }
        };

        while let Some(index) = stack.pop() {
            world = world * self.bone_local[index];
            self.bone_world[index] = world;
            self.bone_marks[index] = Visit::Done;
        }

        self.bone_stack = stack;
        world
    }
}
