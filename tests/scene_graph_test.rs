use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use zoo_ngin::{
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, SceneNode},
    },
    scene::{Axis, Placement},
};

use crate::common::test_utils::assert_matrix_eq;

mod common;

fn turned(position: [f32; 3], degrees: f32, scale: f32) -> Instance {
    Instance {
        position: position.into(),
        rotation: Quaternion::from_axis_angle(Vector3::unit_y(), Deg(degrees)),
        scale: Vector3::new(scale, scale, scale),
    }
}

#[test]
fn composition_matches_the_matrix_product() {
    let parent = turned([1.0, 2.0, 3.0], 90.0, 2.0);
    let local = turned([0.5, 0.0, -1.0], 30.0, 0.5);

    assert_matrix_eq(
        (&parent * &local).to_matrix(),
        parent.to_matrix() * local.to_matrix(),
    );
}

#[test]
fn container_passes_each_placement_to_its_children() {
    let placements = [
        Placement::new([10.0, 0.0, 0.0]).rotate(Axis::Y, 90.0),
        Placement::new([0.0, 0.0, -10.0]).scale(3.0),
    ];
    let node_local = turned([0.0, 1.0, 0.0], 0.0, 1.0);

    let mut root = ContainerNode::new(placements.len());
    for (i, placement) in placements.iter().enumerate() {
        root.set_local_transform(i, placement.to_instance());
    }
    let mut child = ContainerNode::new(placements.len());
    child.set_local_transform_all(&mut |instance| *instance = node_local.clone());
    root.add_child(Box::new(child));

    root.update_world_transform_all();

    let worlds = root.get_children()[0].get_world_transforms();
    assert_eq!(worlds.len(), 2);
    for (world, placement) in worlds.iter().zip(&placements) {
        assert_matrix_eq(
            world.to_matrix(),
            placement.to_instance().to_matrix() * node_local.to_matrix(),
        );
    }
}

#[test]
fn moving_one_placement_leaves_the_others() {
    let mut root = ContainerNode::new(2);
    root.add_child(Box::new(ContainerNode::new(2)));
    root.update_world_transform_all();

    root.set_local_transform(1, Placement::new([0.0, 0.0, 5.0]).to_instance());
    root.update_world_transform_all();

    let worlds = root.get_children()[0].get_world_transforms();
    assert_eq!(worlds[0], Instance::new());
    assert_eq!(worlds[1].position, Vector3::new(0.0, 0.0, 5.0));
}

#[test]
fn out_of_range_updates_are_ignored() {
    let mut root = ContainerNode::new(2);
    root.set_local_transform(0, turned([1.0, 0.0, 0.0], 0.0, 1.0));
    root.update_world_transform_all();
    let before = root.get_world_transforms();

    root.update_world_transforms(5..7, &[Instance::new(), Instance::new()]);
    root.update_world_transforms(0..2, &[Instance::new(), Instance::new(), Instance::new()]);
    root.set_local_transform(9, turned([9.0, 9.0, 9.0], 0.0, 1.0));

    assert_eq!(root.get_world_transforms(), before);
    assert!(root.get_local_transform(9).is_none());
}

#[test]
fn mirrored_copies_flip_handedness() {
    let mirrored = Instance {
        scale: Vector3::new(-1.0, 1.0, 1.0),
        ..Instance::new()
    };
    assert_eq!(mirrored.to_raw().handedness, -1.0);
    assert_eq!(Instance::new().to_raw().handedness, 1.0);

    // the skydome style uniform negative scale also mirrors
    let inside_out = Instance {
        scale: Vector3::new(-2.0, -2.0, -2.0),
        ..Instance::new()
    };
    assert_eq!(inside_out.to_raw().handedness, -1.0);
}
