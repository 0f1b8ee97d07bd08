//! Loading a minimal glTF file end to end.

use softren::prelude::*;

/// Writes a one-triangle glTF with an external buffer and a mask
/// material into a temp directory, then loads and inspects it.
#[test]
fn load_minimal_gltf() {
    let dir = std::env::temp_dir().join("softren_gltf_test");
    std::fs::create_dir_all(&dir).unwrap();

    // Buffer: three vec3<f32> positions.
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let mut bin = Vec::new();
    for p in &positions {
        for &c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    std::fs::write(dir.join("tri.bin"), &bin).unwrap();

    let json = serde_json::json!({
        "asset": { "version": "2.0" },
        "buffers": [{ "uri": "tri.bin", "byteLength": bin.len() }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": bin.len() }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }],
        "materials": [{
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.8, 0.2, 0.1, 1.0],
                "metallicFactor": 0.0,
                "roughnessFactor": 0.4
            },
            "alphaMode": "MASK",
            "alphaCutoff": 0.25,
            "doubleSided": true
        }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] }],
        "nodes": [{ "mesh": 0, "translation": [2.0, 0.0, 0.0], "name": "tri" }],
        "scenes": [{ "nodes": [0] }],
        "scene": 0
    });
    let path = dir.join("tri.gltf");
    std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    let scene = Scene::load_gltf(&path).unwrap();

    // One catalogued mesh with one triangle; normals were synthesized
    // from the face.
    assert_eq!(scene.meshes.len(), 1);
    let mesh = scene.mesh("mesh_0_0").unwrap();
    assert_eq!(mesh.triangles.len(), 1);
    let normal = mesh.triangles[0].v1.normal;
    assert!(normal.approx_eq(&Vector3::UNIT_Z, 1e-6));

    // The node carries the glTF translation into its world transform.
    let node = scene.root.find("tri").expect("node missing");
    assert!(node
        .world_position()
        .approx_eq(&Vector3::new(2.0, 0.0, 0.0), 1e-9));
    assert!(node.mesh.is_some());

    // Material conversion: factors, alpha mask, double-sidedness.
    let material = node.material.clone().expect("material missing");
    assert!(material
        .base_color_factor
        .approx_eq(&Color::new(0.8, 0.2, 0.1, 1.0), 1e-6));
    assert_eq!(material.alpha_mode, AlphaMode::Mask);
    assert!((material.alpha_cutoff - 0.25).abs() < 1e-6);
    assert!((material.roughness_factor - 0.4).abs() < 1e-6);
    assert!(material.double_sided);

    // And the scene renders without error.
    let mut scene = scene;
    scene.add_directional_light(Vector3::new(0.0, 0.0, -1.0), Color::WHITE, 1.0);
    scene.add_camera(Camera::perspective(
        "main",
        Vector3::new(2.0, 0.3, 3.0),
        Vector3::new(2.0, 0.3, 0.0),
        Vector3::UP,
        std::f64::consts::FRAC_PI_4,
        1.0,
        0.1,
        100.0,
    ));
    let mut ctx = RenderContext::new(64, 64).unwrap();
    ctx.clear_color(Color::BLACK);
    let stats = scene.render_to(&mut ctx);
    assert_eq!(stats.nodes_drawn, 1);
    assert_eq!(stats.triangles, 1);

    std::fs::remove_dir_all(&dir).ok();
}
