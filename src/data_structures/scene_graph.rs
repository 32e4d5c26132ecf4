//! Scene graph and hierarchical scene organization.
//!
//! Every node stores one `(local, world)` transform pair per instance. A parent
//! with `n` instances drives `n` instances of each child: instance `i` of the
//! child is placed relative to instance `i` of the parent. This is how one
//! loaded glTF hierarchy is stamped out at every placement of an exhibit.

use std::ops::Range;

use log::warn;
use wgpu::{Device, util::DeviceExt};

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model,
    },
    render::Instanced,
};

/// The `(local, world)` pairs of one node.
#[derive(Debug, Clone, Default)]
pub struct Transforms {
    pairs: Vec<(Instance, Instance)>,
}

impl Transforms {
    /// `amount` identity pairs.
    pub fn new(amount: usize) -> Self {
        Self {
            pairs: (0..amount)
                .map(|_| (Instance::default(), Instance::default()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn local(&self, idx: usize) -> Option<&Instance> {
        self.pairs.get(idx).map(|(local, _)| local)
    }

    pub fn set_local(&mut self, idx: usize, instance: Instance) {
        if let Some((local, _)) = self.pairs.get_mut(idx) {
            *local = instance;
        }
    }

    pub fn locals_mut(&mut self) -> impl Iterator<Item = &mut Instance> {
        self.pairs.iter_mut().map(|(local, _)| local)
    }

    pub fn worlds(&self) -> impl Iterator<Item = &Instance> {
        self.pairs.iter().map(|(_, world)| world)
    }

    pub fn to_raw(&self) -> Vec<InstanceRaw> {
        self.worlds().map(Instance::to_raw).collect()
    }

    /// Recomputes the world transforms of `range` from the parents and returns
    /// them for the children. Mismatched input is reported and ignored.
    pub fn propagate(&mut self, range: Range<usize>, parents: &[Instance]) -> Option<Vec<Instance>> {
        let len = self.pairs.len();
        if parents.len() > len {
            warn!(
                "Cannot apply {} parent transforms to a node with {len} instances.",
                parents.len()
            );
            return None;
        }
        let Some(slice) = self.pairs.get_mut(range.clone()) else {
            warn!(
                "Transform range {}..{} is out of bounds for {len} instances.",
                range.start, range.end
            );
            return None;
        };
        Some(
            slice
                .iter_mut()
                .zip(parents)
                .map(|((local, world), parent)| {
                    *world = parent * &*local;
                    world.clone()
                })
                .collect(),
        )
    }
}

/// A node of the scene graph.
///
/// Implementors only expose their transforms and children; propagation and
/// the per-instance accessors are shared.
pub trait SceneNode {
    fn transforms(&self) -> &Transforms;

    fn transforms_mut(&mut self) -> &mut Transforms;

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    /// Uploads the world transforms of this node and its children.
    fn write_to_buffers(&mut self, queue: &wgpu::Queue);

    fn get_render(&self) -> Vec<Instanced<'_>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.get_children_mut().push(child);
    }

    fn instance_count(&self) -> usize {
        self.transforms().len()
    }

    fn get_local_transform(&self, idx: usize) -> Option<Instance> {
        self.transforms().local(idx).cloned()
    }

    fn get_world_transforms(&self) -> Vec<Instance> {
        self.transforms().worlds().cloned().collect()
    }

    /// Out of range indices are ignored.
    fn set_local_transform(&mut self, idx: usize, instance: Instance) {
        self.transforms_mut().set_local(idx, instance);
    }

    fn set_local_transform_all(&mut self, mutation: &mut dyn FnMut(&mut Instance)) {
        self.transforms_mut().locals_mut().for_each(mutation);
    }

    /**
     * Instance `range.start + i` of this node is placed relative to
     * `parents_world_transform[i]`, and the result is passed on to the same
     * instances of every child.
     */
    fn update_world_transforms(&mut self, range: Range<usize>, parents_world_transform: &[Instance]) {
        let Some(worlds) = self
            .transforms_mut()
            .propagate(range.clone(), parents_world_transform)
        else {
            return;
        };
        for child in self.get_children_mut().iter_mut() {
            child.update_world_transforms(range.clone(), &worlds);
        }
    }

    /// Recomputes every world transform below this node, treating it as a root.
    fn update_world_transform_all(&mut self) {
        let roots = vec![Instance::default(); self.instance_count()];
        self.update_world_transforms(0..roots.len(), &roots);
    }
}

/// Groups children without drawing anything itself.
pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    transforms: Transforms,
}

impl ContainerNode {
    pub fn new(amount: usize) -> Self {
        Self {
            children: Vec::new(),
            transforms: Transforms::new(amount),
        }
    }
}

impl SceneNode for ContainerNode {
    fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    fn transforms_mut(&mut self) -> &mut Transforms {
        &mut self.transforms
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

/// A node that draws a model once per instance.
pub struct ModelNode {
    children: Vec<Box<dyn SceneNode>>,
    transforms: Transforms,
    instance_buffer: wgpu::Buffer,
    model: model::Model,
}

impl ModelNode {
    pub fn from_model(amount: usize, device: &Device, model: model::Model) -> Self {
        let transforms = Transforms::new(amount);
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&transforms.to_raw()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            children: Vec::new(),
            transforms,
            instance_buffer,
            model,
        }
    }
}

impl SceneNode for ModelNode {
    fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    fn transforms_mut(&mut self) -> &mut Transforms {
        &mut self.transforms
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        if !self.transforms.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&self.transforms.to_raw()),
            );
        }
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .chain([Instanced {
                instance: &self.instance_buffer,
                model: &self.model,
                amount: self.transforms.len(),
            }])
            .collect()
    }
}
