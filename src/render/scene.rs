use std::f32::consts::PI;

use crate::{
    animation::timeline::ChannelState,
    foundation::core::{Breakpoint, Mat4, Pose, Vec2, Vec3},
};

/// Number of prisms in the mask array.
pub const PRISM_COUNT: usize = 7;

/// Unscaled prism box extents (width, height, depth).
pub const PRISM_SIZE: Vec3 = Vec3::new(2.0, 35.0, 1.1256);

/// Side of the square plate.
pub const PLATE_SIZE: f32 = 38.0;

/// Animatable node of the scene graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SceneNode {
    /// Parent of all prisms.
    Group,
    Plate,
    /// Prism by index, `0..PRISM_COUNT`.
    Prism(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    PosX,
    PosY,
    PosZ,
    RotX,
    RotY,
    RotZ,
    ScaleX,
    ScaleY,
    ScaleZ,
}

/// One scalar channel of one node; the unit a transform timeline animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneKey {
    pub node: SceneNode,
    pub channel: Channel,
}

impl SceneKey {
    pub const fn new(node: SceneNode, channel: Channel) -> Self {
        Self { node, channel }
    }
}

/// Poses of everything the compositor draws, plus the camera distance.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneTransforms {
    pub camera_z: f32,
    pub group: Pose,
    pub plate: Pose,
    /// Prism poses relative to the group.
    pub prisms: [Pose; PRISM_COUNT],
}

impl SceneTransforms {
    /// Rest layout for a viewport class: prisms fanned out radially by π/12 each and flattened
    /// to a sliver of their depth.
    pub fn initial(breakpoint: Breakpoint) -> Self {
        let mut prisms = [Pose::IDENTITY; PRISM_COUNT];
        for (i, p) in prisms.iter_mut().enumerate() {
            p.rotation.z = PI / 12.0 * i as f32;
            p.scale.z = 0.01;
        }
        let (camera_z, group, plate) = match breakpoint {
            Breakpoint::Compact => (
                18.0,
                Vec3::new(-9.0, -3.5, -15.0),
                Vec3::new(-9.0, -3.5, -16.0),
            ),
            Breakpoint::Wide => (
                5.0,
                Vec3::new(-17.0, -6.0, -15.0),
                Vec3::new(-18.0, -4.5, -19.0),
            ),
        };
        Self {
            camera_z,
            group: Pose::at(group),
            plate: Pose::at(plate),
            prisms,
        }
    }

    pub fn pose(&self, node: SceneNode) -> Option<&Pose> {
        match node {
            SceneNode::Group => Some(&self.group),
            SceneNode::Plate => Some(&self.plate),
            SceneNode::Prism(i) => self.prisms.get(usize::from(i)),
        }
    }

    pub fn pose_mut(&mut self, node: SceneNode) -> Option<&mut Pose> {
        match node {
            SceneNode::Group => Some(&mut self.group),
            SceneNode::Plate => Some(&mut self.plate),
            SceneNode::Prism(i) => self.prisms.get_mut(usize::from(i)),
        }
    }

    /// World matrices of every prism (group transform applied).
    pub fn prism_models(&self) -> [Mat4; PRISM_COUNT] {
        let group = self.group.matrix();
        self.prisms.map(|p| group * p.matrix())
    }

    pub fn plate_model(&self) -> Mat4 {
        self.plate.matrix()
    }
}

fn channel_slot(pose: &Pose, channel: Channel) -> f32 {
    match channel {
        Channel::PosX => pose.position.x,
        Channel::PosY => pose.position.y,
        Channel::PosZ => pose.position.z,
        Channel::RotX => pose.rotation.x,
        Channel::RotY => pose.rotation.y,
        Channel::RotZ => pose.rotation.z,
        Channel::ScaleX => pose.scale.x,
        Channel::ScaleY => pose.scale.y,
        Channel::ScaleZ => pose.scale.z,
    }
}

fn channel_slot_mut(pose: &mut Pose, channel: Channel) -> &mut f32 {
    match channel {
        Channel::PosX => &mut pose.position.x,
        Channel::PosY => &mut pose.position.y,
        Channel::PosZ => &mut pose.position.z,
        Channel::RotX => &mut pose.rotation.x,
        Channel::RotY => &mut pose.rotation.y,
        Channel::RotZ => &mut pose.rotation.z,
        Channel::ScaleX => &mut pose.scale.x,
        Channel::ScaleY => &mut pose.scale.y,
        Channel::ScaleZ => &mut pose.scale.z,
    }
}

impl ChannelState<SceneKey> for SceneTransforms {
    fn channel(&self, key: SceneKey) -> f32 {
        self.pose(key.node)
            .map_or(0.0, |p| channel_slot(p, key.channel))
    }

    fn set_channel(&mut self, key: SceneKey, value: f32) {
        if let Some(p) = self.pose_mut(key.node) {
            *channel_slot_mut(p, key.channel) = value;
        }
    }
}

/// Indexed triangle mesh in local space.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Axis-aligned box centered on the origin.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let corners = [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            4, 5, 6, 4, 6, 7, // +z
            1, 0, 3, 1, 3, 2, // -z
            5, 1, 2, 5, 2, 6, // +x
            0, 4, 7, 0, 7, 3, // -x
            7, 6, 2, 7, 2, 3, // +y
            0, 1, 5, 0, 5, 4, // -y
        ];
        Self {
            positions: corners.to_vec(),
            uvs: vec![Vec2::ZERO; corners.len()],
            indices,
        }
    }

    /// Square in the XY plane facing +z, UV origin at the bottom-left corner.
    pub fn quad(side: f32) -> Self {
        let h = side * 0.5;
        Self {
            positions: vec![
                Vec3::new(-h, -h, 0.0),
                Vec3::new(h, -h, 0.0),
                Vec3::new(h, h, 0.0),
                Vec3::new(-h, h, 0.0),
            ],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Geometry that marks the stencil: one prism mesh instanced per prism pose.
#[derive(Clone, Debug)]
pub struct MaskGeometry {
    pub prism: Mesh,
}

impl Default for MaskGeometry {
    fn default() -> Self {
        Self {
            prism: Mesh::cuboid(PRISM_SIZE),
        }
    }
}

/// The textured square revealed through the mask.
#[derive(Clone, Debug)]
pub struct PlateGeometry {
    pub quad: Mesh,
}

impl Default for PlateGeometry {
    fn default() -> Self {
        Self {
            quad: Mesh::quad(PLATE_SIZE),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
