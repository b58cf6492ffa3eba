//! Scene loading: error taxonomy and the OBJ front-end on real fixtures.

mod common;

use std::path::{Path, PathBuf};

use common::CountingResolver;
use prism::import::{ImportError, ImportOptions, TextureKind, load_model, load_scene};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn missing_file_fails_the_whole_import() {
    let mut resolver = CountingResolver::default();
    let result = load_model(
        fixture("does-not-exist.obj"),
        &ImportOptions::default(),
        &mut resolver,
    );
    // No partially-populated model, no texture loads.
    assert!(matches!(result, Err(ImportError::Obj { .. })));
    assert!(resolver.calls.is_empty());
}

#[test]
fn missing_gltf_reports_the_read_failure() {
    let err = load_scene(fixture("does-not-exist.gltf"), &ImportOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::Read { .. }));
}

#[test]
fn corrupt_gltf_reports_a_parse_failure() {
    let err = load_scene(fixture("broken.gltf"), &ImportOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::Gltf { .. }));
}

#[test]
fn unsupported_extension_is_rejected_up_front() {
    let err = load_scene(fixture("quad.fbx"), &ImportOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat { .. }));
}

#[test]
fn obj_quad_loads_with_material_slots() {
    let scene = load_scene(fixture("quad.obj"), &ImportOptions::default()).unwrap();

    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.root.meshes, vec![0]);
    assert_eq!(scene.mesh_reference_count(), 1);

    let mesh = &scene.meshes[0];
    assert_eq!(mesh.positions.len(), 4);
    // Triangulated quad: two triangle faces.
    assert_eq!(mesh.faces.len(), 2);
    assert!(mesh.faces.iter().all(|f| f.len() == 3));
    assert_eq!(mesh.material, Some(0));

    let material = &scene.materials[0];
    assert_eq!(material.name, "checker");
    assert_eq!(material.diffuse_textures, vec!["tex.png"]);
    assert_eq!(material.specular_textures, vec!["spec.png"]);
}

#[test]
fn flip_v_inverts_the_second_texture_coordinate() {
    let flipped = load_scene(fixture("quad.obj"), &ImportOptions::default()).unwrap();
    let raw = load_scene(
        fixture("quad.obj"),
        &ImportOptions {
            flip_v: false,
            ..Default::default()
        },
    )
    .unwrap();

    let flipped_uvs = flipped.meshes[0].tex_coords.as_ref().unwrap();
    let raw_uvs = raw.meshes[0].tex_coords.as_ref().unwrap();
    assert_eq!(flipped_uvs.len(), raw_uvs.len());
    for (f, r) in flipped_uvs.iter().zip(raw_uvs) {
        assert_eq!(f[0], r[0]);
        assert!((f[1] - (1.0 - r[1])).abs() < f32::EPSILON);
    }
}

#[test]
fn triangulation_flag_controls_face_arity() {
    let scene = load_scene(
        fixture("quad.obj"),
        &ImportOptions {
            triangulate: false,
            ..Default::default()
        },
    )
    .unwrap();

    let mesh = &scene.meshes[0];
    assert_eq!(mesh.faces.len(), 1);
    assert_eq!(mesh.faces[0].len(), 4);
}

#[test]
fn end_to_end_obj_import_resolves_both_texture_slots() {
    let mut resolver = CountingResolver::default();
    let model = load_model(
        fixture("quad.obj"),
        &ImportOptions::default(),
        &mut resolver,
    )
    .unwrap();

    assert_eq!(model.meshes.len(), 1);
    let flat = &model.meshes[0];
    assert_eq!(flat.vertices.len(), 4);
    assert_eq!(flat.indices.len(), 6);

    assert_eq!(flat.textures.len(), 2);
    assert_eq!(flat.textures[0].kind, TextureKind::Diffuse);
    assert_eq!(flat.textures[0].path, "tex.png");
    assert_eq!(flat.textures[1].kind, TextureKind::Specular);
    assert_eq!(flat.textures[1].path, "spec.png");
    assert_eq!(resolver.calls.len(), 2);
}
