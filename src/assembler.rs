//! Scene assembly from a parsed OBJ document
//!
//! A pure function of its input: walks the document's object and group
//! declarations in order, partitions faces and polylines by their
//! declaration-time (object, group) snapshot, resolves vertex references and
//! materials, and builds the output scene graph. Faces and polylines are
//! assembled in two independent passes with separate vertex pools; a pair
//! that declared both kinds yields two distinct object/group node pairs so
//! pools are never shared across primitive kinds.

use log::debug;

use crate::error::{Error, Result};
use crate::model::{ObjDocument, PrimitiveRecord, VertexRef};
use crate::scene::{
    GroupNode, ObjectNode, PoolVertex, Primitive, PrimitiveKind, SceneGraph, VertexPool,
};

/// Assemble a parsed document into a scene graph
///
/// Fails with [`Error::DanglingReference`] when a vertex reference indexes
/// outside the document's attribute lists. Never performs I/O.
pub fn assemble(doc: &ObjDocument) -> Result<SceneGraph> {
    let mut scene = SceneGraph::new();

    for object in &doc.objects {
        if let Some(node) = assemble_object(doc, object, &doc.faces, PrimitiveKind::Polygon)? {
            scene.objects.push(node);
        }
        if let Some(node) = assemble_object(doc, object, &doc.polylines, PrimitiveKind::Polyline)?
        {
            scene.objects.push(node);
        }
    }

    debug!(
        "assembled {} object nodes, {} primitives",
        scene.objects.len(),
        scene.primitive_count()
    );
    Ok(scene)
}

/// Build the object node for one primitive kind, or nothing if no group
/// under this object declared a primitive of that kind
fn assemble_object(
    doc: &ObjDocument,
    object: &str,
    records: &[PrimitiveRecord],
    kind: PrimitiveKind,
) -> Result<Option<ObjectNode>> {
    let mut groups = Vec::new();

    for group in &doc.groups {
        let matched: Vec<&PrimitiveRecord> = records
            .iter()
            .filter(|record| record.key.matches(object, group))
            .collect();
        if matched.is_empty() {
            continue;
        }

        let mut pool = VertexPool::new(format!("{}.{}", object, group));
        let mut primitives = Vec::with_capacity(matched.len());
        for record in matched {
            primitives.push(build_primitive(doc, record, kind, &mut pool)?);
        }
        groups.push(GroupNode {
            name: group.clone(),
            pool,
            primitives,
        });
    }

    if groups.is_empty() {
        return Ok(None);
    }
    Ok(Some(ObjectNode {
        name: object.to_string(),
        groups,
    }))
}

/// Resolve one primitive record: material attachments plus one fresh pool
/// vertex per reference (no deduplication by attribute equality)
fn build_primitive(
    doc: &ObjDocument,
    record: &PrimitiveRecord,
    kind: PrimitiveKind,
    pool: &mut VertexPool,
) -> Result<Primitive> {
    let material = record
        .key
        .material
        .as_deref()
        .and_then(|name| doc.material(name));

    let (texture, shading) = match material {
        Some(mat) if mat.is_textured() => (
            mat.texture_ref().cloned(),
            Some(mat.shading_ref().clone()),
        ),
        _ => (None, None),
    };
    // Flat color is set whenever Kd is defined, textured or not; the
    // emitter decides precedence between color and texture
    let color = material.and_then(|mat| mat.flat_color());

    let mut vertices = Vec::with_capacity(record.refs.len());
    for vertex_ref in &record.refs {
        vertices.push(pool.push(resolve_vertex(doc, vertex_ref)?));
    }

    Ok(Primitive {
        kind,
        vertices,
        texture,
        shading,
        color,
    })
}

/// Resolve a reference's 1-based indices against the document's flat lists
fn resolve_vertex(doc: &ObjDocument, vertex_ref: &VertexRef) -> Result<PoolVertex> {
    let slot = checked_slot(vertex_ref.position, doc.positions.len(), "position")?;
    let position = doc.positions[slot].position;

    let uv = match vertex_ref.uv {
        Some(index) => Some(doc.uvs[checked_slot(index, doc.uvs.len(), "uv")?]),
        None => None,
    };
    let normal = match vertex_ref.normal {
        Some(index) => Some(doc.normals[checked_slot(index, doc.normals.len(), "normal")?]),
        None => None,
    };

    Ok(PoolVertex {
        position,
        uv,
        normal,
    })
}

/// Map a 1-based external index to its 0-based slot, range-checked
fn checked_slot(index: usize, len: usize, kind: &'static str) -> Result<usize> {
    if index == 0 || index > len {
        return Err(Error::DanglingReference { kind, index, len });
    }
    Ok(index - 1)
}
