//! End-to-end export: scene data through the pipeline onto disk.
//!
//! Exercises the whole chain - material split, transform, dedup,
//! winding correction, LWO2 serialization and the atomic commit -
//! the way a converter frontend drives it.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::io::Write;

use model_io::{save_lwo, ExportStream};
use model_math::Transform;
use model_mesh::{Model, SceneMesh, UpAxis};
use nalgebra::{Point3, Vector2, Vector3};
use tempfile::tempdir;

/// A quad (two triangles sharing a diagonal) and a lone triangle on
/// two different materials, with UV and color channels present.
fn two_material_scene() -> SceneMesh {
    SceneMesh {
        positions: vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 1.0),
        ],
        normals: Some(vec![Vector3::new(0.0, -1.0, 0.0); 7]),
        uvs: Some(vec![Vector2::new(0.5, 0.5); 7]),
        colors: Some(vec![Vector3::new(0.8, 0.8, 0.8); 7]),
        triangles: vec![0, 1, 2, 0, 2, 3, 4, 5, 6],
        triangle_materials: Some(vec![0, 0, 1]),
        materials: vec!["stone".to_owned(), "metal".to_owned()],
    }
}

fn build_model(scene: &SceneMesh, transform: &Transform) -> Model {
    let mut model = Model::new();
    for surface in scene.split_by_material().unwrap() {
        model.add_surface(&surface, transform).unwrap();
    }
    model
}

#[test]
fn quad_dedups_and_lone_triangle_stays_separate() {
    let model = build_model(&two_material_scene(), &Transform::identity());

    let stone = model.surface("stone").unwrap();
    assert_eq!(stone.vertex_count(), 4);
    assert_eq!(stone.indices().len(), 6);

    let metal = model.surface("metal").unwrap();
    assert_eq!(metal.vertex_count(), 3);
    assert_eq!(metal.indices().len(), 3);

    for surface in model.surfaces() {
        let count = surface.vertex_count();
        assert!(surface.indices().iter().all(|&i| (i as usize) < count));
    }
}

#[test]
fn export_writes_a_committed_well_formed_file() {
    let scene = two_material_scene();
    let transform = Transform::identity().premultiplied_by(&UpAxis::Y.correction());
    let model = build_model(&scene, &transform);

    let dir = tempdir().unwrap();
    save_lwo(&model, dir.path(), "scene.lwo").unwrap();

    let target = dir.path().join("scene.lwo");
    assert!(target.exists());
    assert!(!dir.path().join("_scene.lwo").exists());

    let bytes = fs::read(&target).unwrap();
    assert_eq!(&bytes[0..4], b"FORM");
    let form_size = u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as usize;
    assert_eq!(form_size, bytes.len() - 8);
    assert_eq!(&bytes[8..12], b"LWO2");

    // Both material names made it into the tag table
    let haystack = bytes.as_slice();
    assert!(haystack.windows(6).any(|w| w == b"stone\0"));
    assert!(haystack.windows(6).any(|w| w == b"metal\0"));
}

#[test]
fn re_export_replaces_the_previous_file() {
    let dir = tempdir().unwrap();

    let small = build_model(&two_material_scene(), &Transform::identity());
    save_lwo(&small, dir.path(), "scene.lwo").unwrap();
    let first = fs::read(dir.path().join("scene.lwo")).unwrap();

    // Accumulate the scene twice: more triangles, bigger file
    let scene = two_material_scene();
    let mut bigger = build_model(&scene, &Transform::identity());
    for surface in scene.split_by_material().unwrap() {
        bigger
            .add_surface(&surface, &Transform::translation(10.0, 0.0, 0.0))
            .unwrap();
    }
    save_lwo(&bigger, dir.path(), "scene.lwo").unwrap();
    let second = fs::read(dir.path().join("scene.lwo")).unwrap();

    assert!(second.len() > first.len());
    assert!(!dir.path().join("_scene.lwo").exists());
}

#[test]
fn failed_export_leaves_previous_file_intact() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("scene.lwo");
    fs::write(&target, b"previous export").unwrap();

    // A frontend that hits an error mid-write drops the stream
    // without closing it
    {
        let mut stream = ExportStream::new(dir.path(), "scene.lwo").unwrap();
        stream.write_all(b"partial garbage").unwrap();
    }

    assert_eq!(fs::read(&target).unwrap(), b"previous export");
    assert!(dir.path().join("_scene.lwo").exists());
}

#[test]
fn up_axis_correction_reorients_positions() {
    let scene = two_material_scene();

    let y_up = build_model(&scene, &UpAxis::Y.correction());
    let z_up = build_model(&scene, &UpAxis::Z.correction());

    // Source point (1, 0, 1): identity keeps it, the Y-up correction
    // tips it to (1, -1, 0)
    let find_x1 = |model: &Model| {
        model
            .surface("stone")
            .unwrap()
            .vertices()
            .iter()
            .find(|v| (v.position.x - 1.0).abs() < 1e-9 && v.position.coords.norm() > 1.1)
            .copied()
            .unwrap()
    };

    let unchanged = find_x1(&z_up);
    assert!((unchanged.position.z - 1.0).abs() < 1e-9);

    let tipped = find_x1(&y_up);
    assert!((tipped.position.y + 1.0).abs() < 1e-9);
    assert!(tipped.position.z.abs() < 1e-9);
}
