//! UV projections.
//!
//! All projections return the number of faces (or islands) they touched and
//! leave the mesh alone when there is nothing sensible to do.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use hew_math::{pca, vec2, Vec2, Vec3};
use hew_topology::EditMesh;

use crate::target_faces;

/// Planar projection along a view direction.
///
/// `view_up` orients the V axis and `scale` is applied in world units.
/// Vertices stay shared, so the result is one continuous chart wherever the
/// target faces are connected.
pub fn project_from_view(mesh: &mut EditMesh, view_dir: Vec3, view_up: Vec3, scale: f32) -> usize {
    let faces = target_faces(mesh);
    if faces.is_empty() {
        tracing::warn!("view projection rejected: no faces to project");
        return 0;
    }
    let Some(forward) = view_dir.try_normalize() else {
        tracing::warn!("view projection rejected: degenerate view direction");
        return 0;
    };
    let Some(right) = view_up.cross(forward).try_normalize() else {
        tracing::warn!("view projection rejected: up axis parallel to the view direction");
        return 0;
    };
    let up = forward.cross(right);

    let vertices: BTreeSet<u32> = faces.iter().flat_map(|&f| mesh.face_vertices(f)).collect();
    for &v in &vertices {
        let p = mesh.vertex(v).position;
        mesh.vertex_mut(v).uv = vec2(p.dot(right), p.dot(up)) * scale;
    }
    tracing::debug!(faces = faces.len(), "projected uvs from view");
    faces.len()
}

/// Six-axis box projection.
///
/// Each face is projected along the dominant axis of its normal. The six
/// direction groups get private vertex copies first, so a corner shared by
/// differently mapped faces does not smear one chart into another.
pub fn project_box(mesh: &mut EditMesh, scale: f32) -> usize {
    let faces = target_faces(mesh);
    if faces.is_empty() {
        tracing::warn!("box projection rejected: no faces to project");
        return 0;
    }

    let mut groups: Vec<Vec<u32>> = vec![Vec::new(); 6];
    for &face in &faces {
        groups[box_slot(mesh.face_normal(face))].push(face);
    }
    groups.retain(|group| !group.is_empty());
    mesh.split_vertices_for_groups(&groups);

    for &face in &faces {
        let slot = box_slot(mesh.face_normal(face));
        for v in mesh.face_vertices(face) {
            let p = mesh.vertex(v).position;
            mesh.vertex_mut(v).uv = box_uv(slot, p) * scale;
        }
    }
    tracing::debug!(faces = faces.len(), "box-projected uvs");
    faces.len()
}

fn box_slot(normal: Vec3) -> usize {
    let a = normal.abs();
    let axis = if a.x >= a.y && a.x >= a.z {
        0
    } else if a.y >= a.z {
        1
    } else {
        2
    };
    axis * 2 + usize::from(normal[axis] >= 0.0)
}

/// Texture axes per box direction, oriented so none of the six charts is
/// mirrored when seen from outside a solid.
fn box_uv(slot: usize, p: Vec3) -> Vec2 {
    match slot {
        0 => vec2(p.z, p.y),
        1 => vec2(-p.z, p.y),
        2 => vec2(p.x, -p.z),
        3 => vec2(p.x, p.z),
        4 => vec2(-p.x, p.y),
        _ => vec2(p.x, p.y),
    }
}

/// Groups faces whose normals agree within `angle_threshold_deg`, projects
/// each group onto its own plane, and lays the groups out side by side with
/// `island_margin` of UV space between them.
///
/// Relative world scale between the groups is preserved; the finished
/// layout is scaled uniformly to fit the unit square. Returns the number of
/// groups.
pub fn project_by_normal_groups(
    mesh: &mut EditMesh,
    angle_threshold_deg: f32,
    island_margin: f32,
) -> usize {
    let faces = target_faces(mesh);
    if faces.is_empty() {
        tracing::warn!("normal-group projection rejected: no faces to project");
        return 0;
    }
    let threshold = angle_threshold_deg.to_radians().cos();

    // Greedy clustering against the first normal seen per cluster.
    let mut clusters: Vec<Vec<u32>> = Vec::new();
    let mut representatives: Vec<Vec3> = Vec::new();
    for &face in &faces {
        let normal = mesh.face_normal(face);
        match representatives.iter().position(|&r| r.dot(normal) >= threshold) {
            Some(i) => clusters[i].push(face),
            None => {
                representatives.push(normal);
                clusters.push(vec![face]);
            }
        }
    }
    mesh.split_vertices_for_groups(&clusters);

    // Each cluster projected into its own frame, still in world units.
    let mut rects: Vec<Vec2> = Vec::with_capacity(clusters.len());
    let mut local: Vec<Vec<(u32, Vec2)>> = Vec::with_capacity(clusters.len());
    for (cluster, &normal) in clusters.iter().zip(&representatives) {
        let (u_axis, v_axis) = perpendicular_basis(safe_axis(normal));
        let members: BTreeSet<u32> =
            cluster.iter().flat_map(|&f| mesh.face_vertices(f)).collect();
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        let mut entries = Vec::with_capacity(members.len());
        for &v in &members {
            let p = mesh.vertex(v).position;
            let uv = vec2(p.dot(u_axis), p.dot(v_axis));
            min = min.min(uv);
            max = max.max(uv);
            entries.push((v, uv));
        }
        for (_, uv) in &mut entries {
            *uv -= min;
        }
        rects.push(max - min);
        local.push(entries);
    }

    let (placements, extent) = crate::pack::shelf_pack(&rects, island_margin);
    let fit = 1.0 / extent.max_element().max(f32::MIN_POSITIVE);
    for (entries, &placement) in local.iter().zip(&placements) {
        for &(v, uv) in entries {
            mesh.vertex_mut(v).uv = (placement + uv) * fit;
        }
    }
    tracing::debug!(
        groups = clusters.len(),
        faces = faces.len(),
        "normal-group projected uvs"
    );
    clusters.len()
}

/// Normal-group projection with the editor's default clustering angle and
/// island margin.
pub fn smart_project(mesh: &mut EditMesh) -> usize {
    project_by_normal_groups(mesh, 66.0, 0.02)
}

/// Every face becomes its own square chart on a uniform grid.
pub fn project_per_face(mesh: &mut EditMesh) -> usize {
    let faces = target_faces(mesh);
    if faces.is_empty() {
        tracing::warn!("per-face projection rejected: no faces to project");
        return 0;
    }
    let groups: Vec<Vec<u32>> = faces.iter().map(|&f| vec![f]).collect();
    mesh.split_vertices_for_groups(&groups);

    let cells = (faces.len() as f32).sqrt().ceil() as usize;
    let cell = 1.0 / cells as f32;
    for (i, &face) in faces.iter().enumerate() {
        let column = (i % cells) as f32;
        let row = (i / cells) as f32;
        for (v, uv) in face_plane_uvs(mesh, face) {
            mesh.vertex_mut(v).uv = (vec2(column, row) + Vec2::splat(0.05) + uv * 0.9) * cell;
        }
    }
    tracing::debug!(faces = faces.len(), "per-face projected uvs");
    faces.len()
}

/// Maps every face to the same unit square: quads corner to corner, other
/// rings by their normalized planar outline. Useful for tiling textures
/// over walls built from quads.
pub fn project_uniform(mesh: &mut EditMesh) -> usize {
    let faces = target_faces(mesh);
    if faces.is_empty() {
        tracing::warn!("uniform projection rejected: no faces to project");
        return 0;
    }
    let groups: Vec<Vec<u32>> = faces.iter().map(|&f| vec![f]).collect();
    mesh.split_vertices_for_groups(&groups);

    const QUAD_CORNERS: [Vec2; 4] = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    for &face in &faces {
        let ring = mesh.face_vertices(face);
        if ring.len() == 4 {
            for (corner, &v) in QUAD_CORNERS.iter().zip(&ring) {
                mesh.vertex_mut(v).uv = *corner;
            }
        } else {
            for (v, uv) in face_plane_uvs(mesh, face) {
                mesh.vertex_mut(v).uv = uv;
            }
        }
    }
    tracing::debug!(faces = faces.len(), "uniform projected uvs");
    faces.len()
}

/// Wraps UVs around a cylinder.
///
/// The axis comes from the caller or, when `None`, from the dominant
/// principal axis of the projected vertices. U follows the angle around the
/// axis, V the height along it, normalized over the projected span. Faces
/// crossing the angular wrap get private vertex copies and continue past
/// u = 1 so the texture repeats instead of smearing backwards across them.
pub fn project_cylindrical(mesh: &mut EditMesh, axis: Option<Vec3>) -> usize {
    let faces = target_faces(mesh);
    if faces.is_empty() {
        tracing::warn!("cylindrical projection rejected: no faces to project");
        return 0;
    }
    let members: BTreeSet<u32> = faces.iter().flat_map(|&f| mesh.face_vertices(f)).collect();
    let points: Vec<Vec3> = members.iter().map(|&v| mesh.vertex(v).position).collect();

    let (axis, center) = match axis.and_then(|a| a.try_normalize()) {
        Some(a) => (a, pca::centroid(&points)),
        None => match pca::principal_axes(&points) {
            Some(frame) => (frame.axes[0], frame.centroid),
            None => {
                tracing::warn!("cylindrical projection rejected: no usable axis");
                return 0;
            }
        },
    };
    let (u_axis, v_axis) = perpendicular_basis(axis);

    let mut height_min = f32::MAX;
    let mut height_max = f32::MIN;
    for &p in &points {
        let h = (p - center).dot(axis);
        height_min = height_min.min(h);
        height_max = height_max.max(h);
    }
    let height_span = (height_max - height_min).max(f32::MIN_POSITIVE);

    let angle_u = |mesh: &EditMesh, v: u32| -> f32 {
        let rel = mesh.vertex(v).position - center;
        rel.dot(v_axis).atan2(rel.dot(u_axis)) / TAU + 0.5
    };

    // Faces whose ring spans more than half a turn sit on the wrap.
    let wrapped: BTreeSet<u32> = faces
        .iter()
        .copied()
        .filter(|&face| {
            let mut lo = f32::MAX;
            let mut hi = f32::MIN;
            for v in mesh.face_vertices(face) {
                let u = angle_u(mesh, v);
                lo = lo.min(u);
                hi = hi.max(u);
            }
            hi - lo > 0.5
        })
        .collect();
    if !wrapped.is_empty() {
        let rest: Vec<u32> = faces.iter().copied().filter(|f| !wrapped.contains(f)).collect();
        mesh.split_vertices_for_groups(&[wrapped.iter().copied().collect(), rest]);
    }

    for &face in &faces {
        let past_seam = wrapped.contains(&face);
        for v in mesh.face_vertices(face) {
            let mut u = angle_u(mesh, v);
            if past_seam && u < 0.5 {
                u += 1.0;
            }
            let h = (mesh.vertex(v).position - center).dot(axis);
            mesh.vertex_mut(v).uv = vec2(u, (h - height_min) / height_span);
        }
    }
    tracing::debug!(
        faces = faces.len(),
        seam_faces = wrapped.len(),
        "cylindrically projected uvs"
    );
    faces.len()
}

/// A face's ring projected onto its own plane, normalized into the unit
/// square with aspect preserved.
fn face_plane_uvs(mesh: &EditMesh, face: u32) -> Vec<(u32, Vec2)> {
    let (u_axis, v_axis) = perpendicular_basis(safe_axis(mesh.face_normal(face)));
    let mut entries: Vec<(u32, Vec2)> = mesh
        .face_vertices(face)
        .into_iter()
        .map(|v| {
            let p = mesh.vertex(v).position;
            (v, vec2(p.dot(u_axis), p.dot(v_axis)))
        })
        .collect();
    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    for &(_, uv) in &entries {
        min = min.min(uv);
        max = max.max(uv);
    }
    let span = (max - min).max_element().max(f32::MIN_POSITIVE);
    for (_, uv) in &mut entries {
        *uv = (*uv - min) / span;
    }
    entries
}

/// Any orthonormal pair perpendicular to a unit `axis`.
fn perpendicular_basis(axis: Vec3) -> (Vec3, Vec3) {
    let helper = if axis.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let u = axis.cross(helper).normalize();
    let v = axis.cross(u);
    (u, v)
}

/// Face normals can degenerate to zero on slivers; fall back to Z so the
/// projection stays finite.
fn safe_axis(normal: Vec3) -> Vec3 {
    normal.try_normalize().unwrap_or(Vec3::Z)
}
