//! Properties of the traversal and flattening pass, exercised on hand-built
//! scenes with a fake texture collaborator.

mod common;

use std::path::Path;

use common::{CountingResolver, material, mesh, node, scene};
use prism::import::{MeshRecord, TextureKind, flatten_scene};

#[test]
fn every_mesh_reference_is_flattened_exactly_once_in_order() {
    // root(a) -> [left(b, c), right -> [inner(a)]]: 4 references, parent
    // meshes before children, children in stored order.
    let s = scene(
        node(
            "root",
            &[0],
            vec![
                node("left", &[1, 2], vec![]),
                node("right", &[], vec![node("inner", &[0], vec![])]),
            ],
        ),
        vec![
            mesh("a", 3, &[&[0, 1, 2]], None),
            mesh("b", 3, &[&[0, 1, 2]], None),
            mesh("c", 3, &[&[0, 1, 2]], None),
        ],
        vec![],
    );
    assert_eq!(s.mesh_reference_count(), 4);

    let mut resolver = CountingResolver::default();
    let model = flatten_scene(&s, Path::new("."), &mut resolver);

    let names = model.meshes.iter().map(|m| m.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["a", "b", "c", "a"]);
}

#[test]
fn index_sequence_is_face_count_times_arity_and_in_bounds() {
    // 3 quads over 8 vertices: 12 indices, every one below the vertex count.
    let s = scene(
        node("root", &[0], vec![]),
        vec![mesh(
            "quads",
            8,
            &[&[0, 1, 2, 3], &[4, 5, 6, 7], &[0, 2, 4, 6]],
            None,
        )],
        vec![],
    );

    let mut resolver = CountingResolver::default();
    let model = flatten_scene(&s, Path::new("."), &mut resolver);

    let flat = &model.meshes[0];
    assert_eq!(flat.indices.len(), 3 * 4);
    assert!(flat.indices.iter().all(|&i| (i as usize) < flat.vertices.len()));
}

#[test]
fn two_triangles_flatten_to_the_expected_index_sequence() {
    let s = scene(
        node("root", &[0], vec![]),
        vec![mesh("tris", 4, &[&[0, 1, 3], &[1, 2, 3]], None)],
        vec![],
    );

    let mut resolver = CountingResolver::default();
    let model = flatten_scene(&s, Path::new("."), &mut resolver);

    let flat = &model.meshes[0];
    assert_eq!(flat.indices, vec![0, 1, 3, 1, 2, 3]);
    assert_eq!(flat.vertices.len(), 4);
    // Vertices keep their original order.
    let xs = flat.vertices.iter().map(|v| v.position[0]).collect::<Vec<_>>();
    assert_eq!(xs, [0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn missing_tex_coords_default_to_zero() {
    let s = scene(
        node("root", &[0], vec![]),
        vec![MeshRecord {
            name: "no_uv".to_string(),
            positions: vec![[0.0; 3], [1.0, 0.0, 0.0]],
            normals: Some(vec![[0.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
            tex_coords: None,
            faces: vec![vec![0, 1]],
            material: None,
        }],
        vec![],
    );

    let mut resolver = CountingResolver::default();
    let model = flatten_scene(&s, Path::new("."), &mut resolver);

    for vertex in &model.meshes[0].vertices {
        assert_eq!(vertex.tex_coords, [0.0, 0.0]);
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
    }
}

#[test]
fn shared_texture_path_is_loaded_once_and_handle_reused() {
    // Two meshes, two materials, one common diffuse path.
    let s = scene(
        node("root", &[0, 1], vec![]),
        vec![
            mesh("first", 3, &[&[0, 1, 2]], Some(0)),
            mesh("second", 3, &[&[0, 1, 2]], Some(1)),
        ],
        vec![
            material("m0", &["shared.png"], &[]),
            material("m1", &["shared.png", "extra.png"], &[]),
        ],
    );

    let mut resolver = CountingResolver::default();
    let model = flatten_scene(&s, Path::new("."), &mut resolver);

    assert_eq!(resolver.calls_for("shared.png"), 1);
    assert_eq!(resolver.calls_for("extra.png"), 1);

    let first = &model.meshes[0].textures[0];
    let second = model.meshes[1]
        .textures
        .iter()
        .find(|t| t.path == "shared.png")
        .unwrap();
    assert_eq!(first.handle, second.handle);
}

#[test]
fn cache_hit_reuses_the_original_slot_label() {
    // The same path referenced from a different slot still resolves to the
    // cached entry, label included.
    let s = scene(
        node("root", &[0, 1], vec![]),
        vec![
            mesh("first", 3, &[&[0, 1, 2]], Some(0)),
            mesh("second", 3, &[&[0, 1, 2]], Some(1)),
        ],
        vec![
            material("m0", &["both.png"], &[]),
            material("m1", &[], &["both.png"]),
        ],
    );

    let mut resolver = CountingResolver::default();
    let model = flatten_scene(&s, Path::new("."), &mut resolver);

    assert_eq!(resolver.calls_for("both.png"), 1);
    assert_eq!(model.meshes[1].textures[0].kind, TextureKind::Diffuse);
    assert_eq!(model.meshes[1].textures[0].kind.label(), "texture_diffuse");
}

#[test]
fn unreadable_texture_is_omitted_without_aborting() {
    let s = scene(
        node("root", &[0, 1], vec![]),
        vec![
            mesh("broken", 3, &[&[0, 1, 2]], Some(0)),
            mesh("fine", 3, &[&[0, 1, 2]], Some(1)),
        ],
        vec![
            material("m0", &["missing.png", "good.png"], &[]),
            material("m1", &["other.png"], &[]),
        ],
    );

    let mut resolver = CountingResolver {
        fail_paths: vec!["missing.png".to_string()],
        ..Default::default()
    };
    let model = flatten_scene(&s, Path::new("."), &mut resolver);

    // The failing texture is dropped, everything else proceeds.
    let broken = &model.meshes[0];
    assert_eq!(broken.textures.len(), 1);
    assert_eq!(broken.textures[0].path, "good.png");
    assert_eq!(model.meshes[1].textures.len(), 1);
    // A failure is not cached; geometry is unaffected.
    assert_eq!(broken.vertices.len(), 3);
}
