//! End-to-end conversion tests against real files on disk

use std::fs;
use std::path::Path;

use objscene::{
    DEFAULT_GROUP, DEFAULT_OBJECT, Error, PostProcess, PrimitiveKind, Result, SceneEmitter,
    SceneGraph, convert, parse_obj,
};

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_triangle_without_containers_lands_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_file(dir.path(), "tri.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");

    let scene = convert(&obj).unwrap();

    assert_eq!(scene.objects.len(), 1);
    let object = &scene.objects[0];
    assert_eq!(object.name, DEFAULT_OBJECT);
    assert_eq!(object.groups.len(), 1);
    let group = &object.groups[0];
    assert_eq!(group.name, DEFAULT_GROUP);
    assert_eq!(group.pool.vertices.len(), 3);
    assert_eq!(group.primitives.len(), 1);
    assert_eq!(group.primitives[0].kind, PrimitiveKind::Polygon);
}

#[test]
fn test_red_material_gives_flat_color_and_no_texture() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "colors.mtl", "newmtl red\nKd 1 0 0\n");
    let obj = write_file(
        dir.path(),
        "tri.obj",
        "mtllib colors.mtl\nusemtl red\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
    );

    let scene = convert(&obj).unwrap();
    let primitive = &scene.objects[0].groups[0].primitives[0];
    assert_eq!(primitive.color, Some([1.0, 0.0, 0.0, 1.0]));
    assert!(primitive.texture.is_none());
}

#[test]
fn test_textured_material_gives_texture_and_flat_color() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("crate.png"), b"png").unwrap();
    write_file(
        dir.path(),
        "crate.mtl",
        "newmtl crate\nKd 0.2 0.4 0.6\nmap_Kd crate.png\n",
    );
    let obj = write_file(
        dir.path(),
        "crate.obj",
        "mtllib crate.mtl\nusemtl crate\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
    );

    let scene = convert(&obj).unwrap();
    let primitive = &scene.objects[0].groups[0].primitives[0];

    let texture = primitive.texture.as_ref().unwrap();
    assert_eq!(texture.name, "crate_diffuse");
    assert_eq!(texture.path, "crate.png");
    let shading = primitive.shading.as_ref().unwrap();
    assert_eq!(shading.name, "crate_mat");
    assert_eq!(shading.diffuse, Some([0.2, 0.4, 0.6, 1.0]));
    // Both texture and color are attached; precedence is the emitter's call
    assert_eq!(primitive.color, Some([0.2, 0.4, 0.6, 1.0]));
}

#[test]
fn test_second_mtllib_overrides_on_name_collision() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "first.mtl", "newmtl red\nKd 1 0 0\n");
    write_file(dir.path(), "second.mtl", "newmtl red\nKd 0.5 0 0\n");
    let obj = write_file(
        dir.path(),
        "model.obj",
        "mtllib first.mtl\nmtllib second.mtl\nusemtl red\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
    );

    let doc = parse_obj(&obj).unwrap();
    assert_eq!(doc.libraries.len(), 2);
    let red = doc.material("red").unwrap();
    assert_eq!(red.flat_color(), Some([0.5, 0.0, 0.0, 1.0]));

    let scene = objscene::assemble(&doc).unwrap();
    let primitive = &scene.objects[0].groups[0].primitives[0];
    assert_eq!(primitive.color, Some([0.5, 0.0, 0.0, 1.0]));
}

#[test]
fn test_group_persists_across_object_switch() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_file(
        dir.path(),
        "asym.obj",
        "o A\ng B\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no C\nf 1 2 3\n",
    );

    let scene = convert(&obj).unwrap();

    let a = scene.object("A").unwrap();
    assert!(a.group("B").is_some());
    let c = scene.object("C").unwrap();
    assert!(c.group("B").is_some());
}

#[test]
fn test_mixed_kinds_give_two_nodes_with_separate_pools() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_file(
        dir.path(),
        "mixed.obj",
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nl 1 2\n",
    );

    let scene = convert(&obj).unwrap();
    assert_eq!(scene.objects.len(), 2);

    let face_group = &scene.objects[0].groups[0];
    let line_group = &scene.objects[1].groups[0];
    assert_eq!(face_group.primitives[0].kind, PrimitiveKind::Polygon);
    assert_eq!(line_group.primitives[0].kind, PrimitiveKind::Polyline);
    assert_eq!(face_group.pool.vertices.len(), 3);
    assert_eq!(line_group.pool.vertices.len(), 2);
}

#[test]
fn test_out_of_range_index_is_dangling() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_file(dir.path(), "dangling.obj", "v 0 0 0\nv 1 0 0\nf 1 2 4\n");

    let err = convert(&obj).unwrap_err();
    assert!(matches!(
        err,
        Error::DanglingReference {
            kind: "position",
            index: 4,
            len: 2,
        }
    ));
}

#[test]
fn test_malformed_reference_aborts_file_but_not_batch() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write_file(
        dir.path(),
        "bad.obj",
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/2/3/4 2 3\n",
    );
    let good = write_file(dir.path(), "good.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");

    // A batch driver converts per file and keeps going on failure
    let mut converted = Vec::new();
    let mut failures = Vec::new();
    for path in [&bad, &good] {
        match convert(path) {
            Ok(scene) => converted.push(scene),
            Err(err) => failures.push(err),
        }
    }

    assert_eq!(converted.len(), 1);
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0],
        Error::MalformedVertexReference { .. }
    ));
    assert_eq!(converted[0].primitive_count(), 1);
}

#[test]
fn test_scene_feeds_an_emitter() {
    struct CountingEmitter {
        primitives: usize,
        triangulate_requested: bool,
    }

    impl SceneEmitter for CountingEmitter {
        fn emit(&mut self, scene: SceneGraph, post: &PostProcess) -> Result<()> {
            self.primitives += scene.primitive_count();
            self.triangulate_requested = post.triangulate;
            Ok(())
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let obj = write_file(
        dir.path(),
        "quad.obj",
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
    );

    let scene = convert(&obj).unwrap();
    let mut emitter = CountingEmitter {
        primitives: 0,
        triangulate_requested: false,
    };
    let post = PostProcess::new().with_normals(30.0);
    emitter.emit(scene, &post).unwrap();

    assert_eq!(emitter.primitives, 1);
    assert!(emitter.triangulate_requested);
}

#[test]
fn test_unreadable_file_is_io_error() {
    let err = convert("/nonexistent/model.obj").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
