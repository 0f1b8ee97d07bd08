//! glTF 2.0 scene loading.
//!
//! Resolves accessors into typed vertex arrays, converts glTF materials
//! into [`PbrMaterial`], decodes referenced images into textures, and
//! rebuilds the node hierarchy with its local transforms.

use super::LoadError;
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::material::{AlphaMode, PbrMaterial};
use crate::math::{Color, Matrix4, Vector3};
use crate::scene::{Scene, SceneNode};
use crate::texture::Texture2D;
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;

impl Scene {
    /// Load a glTF or GLB file into a scene.
    ///
    /// The default glTF scene's roots become children of the scene root;
    /// each mesh primitive becomes a catalogued mesh. Primitives with no
    /// material reference a shared default material.
    pub fn load_gltf(path: impl AsRef<Path>) -> Result<Scene, LoadError> {
        let path = path.as_ref();
        let (document, buffers, images) = gltf::import(path)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("gltf")
            .to_owned();
        let mut scene = Scene::new(name);

        let mut textures: Vec<Arc<Texture2D>> = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let texture = convert_image(image)?;
            textures.push(scene.add_texture(format!("texture_{i}"), texture));
        }

        let mut materials: Vec<Arc<PbrMaterial>> = Vec::new();
        for (i, material) in document.materials().enumerate() {
            let name = material
                .name()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("material_{i}"));
            materials.push(scene.add_material(name, convert_material(&material, &textures)));
        }
        let default_material = scene.add_material("default", PbrMaterial::new());

        // One catalogued mesh per primitive, paired with its material.
        let mut primitive_table: Vec<Vec<(Arc<Mesh>, Arc<PbrMaterial>)>> = Vec::new();
        for mesh in document.meshes() {
            let mut primitives = Vec::new();
            for (pi, primitive) in mesh.primitives().enumerate() {
                let Some(converted) = convert_primitive(&primitive, &buffers)? else {
                    continue;
                };
                let handle =
                    scene.add_mesh(format!("mesh_{}_{}", mesh.index(), pi), converted);
                let material = primitive
                    .material()
                    .index()
                    .and_then(|i| materials.get(i).cloned())
                    .unwrap_or_else(|| Arc::clone(&default_material));
                primitives.push((handle, material));
            }
            primitive_table.push(primitives);
        }

        if let Some(gltf_scene) = document.default_scene().or_else(|| document.scenes().next()) {
            for node in gltf_scene.nodes() {
                let converted = convert_node(&node, &primitive_table);
                scene.root.add_child(converted);
            }
        }

        debug!(
            "loaded {}: {} meshes, {} materials, {} textures",
            path.display(),
            scene.meshes.len(),
            scene.materials.len(),
            scene.textures.len()
        );
        Ok(scene)
    }
}

fn convert_node(
    node: &gltf::Node,
    primitive_table: &[Vec<(Arc<Mesh>, Arc<PbrMaterial>)>],
) -> SceneNode {
    let name = node
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("node_{}", node.index()));
    let mut out = SceneNode::new(name.clone());
    out.set_transform(matrix_from_gltf(node.transform().matrix()));

    if let Some(mesh) = node.mesh() {
        let primitives = &primitive_table[mesh.index()];
        if let [(mesh_handle, material)] = primitives.as_slice() {
            out.mesh = Some(Arc::clone(mesh_handle));
            out.material = Some(Arc::clone(material));
        } else {
            // Multi-primitive meshes become one child node per primitive.
            for (pi, (mesh_handle, material)) in primitives.iter().enumerate() {
                let mut child = SceneNode::new(format!("{name}_primitive_{pi}"));
                child.mesh = Some(Arc::clone(mesh_handle));
                child.material = Some(Arc::clone(material));
                out.add_child(child);
            }
        }
    }

    for child in node.children() {
        let converted = convert_node(&child, primitive_table);
        out.add_child(converted);
    }
    out
}

fn convert_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<Option<Mesh>, LoadError> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        warn!("skipping primitive with mode {:?}", primitive.mode());
        return Ok(None);
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

    let positions: Vec<Vector3> = reader
        .read_positions()
        .ok_or_else(|| LoadError::Parse("primitive has no POSITION accessor".into()))?
        .map(|p| Vector3::new(p[0] as f64, p[1] as f64, p[2] as f64))
        .collect();

    let normals: Option<Vec<Vector3>> = reader
        .read_normals()
        .map(|iter| iter.map(|n| Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64)).collect());

    // glTF UVs have a top-left origin; the sampler flips v, so store the
    // complement to cancel out.
    let texcoords: Option<Vec<Vector3>> = reader
        .read_tex_coords(0)
        .map(|tc| {
            tc.into_f32()
                .map(|uv| Vector3::new(uv[0] as f64, 1.0 - uv[1] as f64, 0.0))
                .collect()
        });

    let colors: Option<Vec<Color>> = reader.read_colors(0).map(|c| {
        c.into_rgba_f32()
            .map(|rgba| Color::new(rgba[0] as f64, rgba[1] as f64, rgba[2] as f64, rgba[3] as f64))
            .collect()
    });

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let vertex_at = |i: u32| -> Result<Vertex, LoadError> {
        let i = i as usize;
        let position = *positions
            .get(i)
            .ok_or_else(|| LoadError::Parse(format!("vertex index {i} out of range")))?;
        let mut v = Vertex::from_position(position);
        if let Some(normals) = &normals {
            v.normal = normals[i];
        }
        if let Some(texcoords) = &texcoords {
            v.texcoord = texcoords[i];
        }
        if let Some(colors) = &colors {
            v.color = colors[i];
        }
        Ok(v)
    };

    let mut triangles = Vec::with_capacity(indices.len() / 3);
    for triple in indices.chunks_exact(3) {
        let mut t = Triangle::new(
            vertex_at(triple[0])?,
            vertex_at(triple[1])?,
            vertex_at(triple[2])?,
        );
        if normals.is_none() {
            t.fix_normals();
        }
        triangles.push(t);
    }

    Ok(Some(Mesh::from_triangles(triangles)))
}

fn convert_material(material: &gltf::Material, textures: &[Arc<Texture2D>]) -> PbrMaterial {
    let mut out = PbrMaterial::new();
    let pbr = material.pbr_metallic_roughness();

    let base = pbr.base_color_factor();
    out.base_color_factor = Color::new(
        base[0] as f64,
        base[1] as f64,
        base[2] as f64,
        base[3] as f64,
    );
    out.metallic_factor = pbr.metallic_factor() as f64;
    out.roughness_factor = pbr.roughness_factor() as f64;

    let texture_for = |index: usize| textures.get(index).cloned();
    if let Some(info) = pbr.base_color_texture() {
        out.base_color_texture = texture_for(info.texture().source().index());
    }
    if let Some(info) = pbr.metallic_roughness_texture() {
        out.metallic_roughness_texture = texture_for(info.texture().source().index());
    }
    if let Some(normal) = material.normal_texture() {
        out.normal_texture = texture_for(normal.texture().source().index());
        out.normal_scale = normal.scale() as f64;
    }
    if let Some(occlusion) = material.occlusion_texture() {
        out.occlusion_texture = texture_for(occlusion.texture().source().index());
        out.occlusion_strength = occlusion.strength() as f64;
    }

    let emissive = material.emissive_factor();
    out.emissive_factor = Color::new(
        emissive[0] as f64,
        emissive[1] as f64,
        emissive[2] as f64,
        1.0,
    );
    if let Some(info) = material.emissive_texture() {
        out.emissive_texture = texture_for(info.texture().source().index());
    }

    out.alpha_mode = match material.alpha_mode() {
        gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
        gltf::material::AlphaMode::Mask => AlphaMode::Mask,
        gltf::material::AlphaMode::Blend => AlphaMode::Blend,
    };
    out.alpha_cutoff = material.alpha_cutoff().unwrap_or(0.5) as f64;
    out.double_sided = material.double_sided();

    out
}

fn convert_image(image: &gltf::image::Data) -> Result<Texture2D, LoadError> {
    use gltf::image::Format;

    let width = image.width as usize;
    let height = image.height as usize;
    let pixels = &image.pixels;
    let count = width * height;

    let data: Vec<u8> = match image.format {
        Format::R8G8B8A8 => pixels.clone(),
        Format::R8G8B8 => {
            let mut out = Vec::with_capacity(count * 4);
            for rgb in pixels.chunks_exact(3) {
                out.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
            out
        }
        Format::R8G8 => {
            let mut out = Vec::with_capacity(count * 4);
            for rg in pixels.chunks_exact(2) {
                out.extend_from_slice(&[rg[0], rg[1], 0, 255]);
            }
            out
        }
        Format::R8 => {
            let mut out = Vec::with_capacity(count * 4);
            for &r in pixels {
                out.extend_from_slice(&[r, r, r, 255]);
            }
            out
        }
        // 16-bit channels are quantized to their high byte.
        Format::R16 | Format::R16G16 | Format::R16G16B16 | Format::R16G16B16A16 => {
            let channels = match image.format {
                Format::R16 => 1,
                Format::R16G16 => 2,
                Format::R16G16B16 => 3,
                _ => 4,
            };
            let mut out = Vec::with_capacity(count * 4);
            for texel in pixels.chunks_exact(channels * 2) {
                let mut rgba = [0, 0, 0, 255];
                for c in 0..channels {
                    rgba[c] = texel[c * 2 + 1];
                }
                if channels == 1 {
                    rgba[1] = rgba[0];
                    rgba[2] = rgba[0];
                }
                out.extend_from_slice(&rgba);
            }
            out
        }
        other => {
            return Err(LoadError::Unsupported(format!(
                "image format {other:?} is not supported"
            )))
        }
    };

    Ok(Texture2D::new(width, height, data)?)
}

fn matrix_from_gltf(m: [[f32; 4]; 4]) -> Matrix4 {
    // glTF matrices are column-major.
    let mut e = [0.0; 16];
    for (col, column) in m.iter().enumerate() {
        for (row, &value) in column.iter().enumerate() {
            e[row * 4 + col] = value as f64;
        }
    }
    Matrix4::from_rows_array(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_from_gltf_translation() {
        // A glTF translation stores the offset in the fourth column.
        let m = matrix_from_gltf([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [1.0, 2.0, 3.0, 1.0],
        ]);
        let p = m.mul_position(&Vector3::ZERO);
        assert!(p.approx_eq(&Vector3::new(1.0, 2.0, 3.0), 1e-12));
    }

    #[test]
    fn test_convert_rgb_image() {
        let image = gltf::image::Data {
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
            pixels: vec![255, 0, 0, 0, 255, 0],
        };
        let texture = convert_image(&image).unwrap();
        assert_eq!(texture.width(), 2);
        assert!(texture
            .sample_with_filter(0.0, 1.0, crate::texture::FilterMode::Nearest)
            .approx_eq(&Color::RED, 1e-2));
    }
}
