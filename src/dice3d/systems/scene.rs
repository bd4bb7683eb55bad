//! Scene assembly
//!
//! Keeps one die entity per stage instance. Geometry, edge lines, textures
//! and sparkle meshes are shared through `DieAssetCache`, so adding the same
//! die twice costs one set of entities and a material.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::dice3d::appearance::{
    edge_material, DieColor, SparkleCloud, SurfaceMaterial, TextureCache,
};
use crate::dice3d::gesture::GestureController;
use crate::dice3d::layout::GridLayout;
use crate::dice3d::meshes::{GeometryCache, GeometryKey};
use crate::dice3d::orientation::orientation_degrees;
use crate::dice3d::types::*;

/// GPU-side handles built from the pure geometry and texture caches.
#[derive(Resource, Default)]
pub struct DieAssetCache {
    pub geometry: GeometryCache,
    pub textures: TextureCache,
    die_meshes: HashMap<GeometryKey, (Handle<Mesh>, Handle<Mesh>)>,
    sparkle_meshes: HashMap<usize, Handle<Mesh>>,
}

impl DieAssetCache {
    /// Body and edge meshes for a die shape.
    pub fn die_meshes(
        &mut self,
        sides: u32,
        orientation_degrees: u32,
        meshes: &mut Assets<Mesh>,
    ) -> (Handle<Mesh>, Handle<Mesh>) {
        let key = GeometryKey::new(sides, orientation_degrees);
        if let Some(handles) = self.die_meshes.get(&key) {
            return handles.clone();
        }
        let geometry = self.geometry.get_or_build(key.sides, key.orientation_degrees);
        let handles = (meshes.add(geometry.to_mesh()), meshes.add(geometry.edge_mesh()));
        self.die_meshes.insert(key, handles.clone());
        handles
    }

    /// Sparkle clouds are fully determined by their point count.
    pub fn sparkle_mesh(
        &mut self,
        cloud: &SparkleCloud,
        meshes: &mut Assets<Mesh>,
    ) -> Handle<Mesh> {
        self.sparkle_meshes
            .entry(cloud.points.len())
            .or_insert_with(|| meshes.add(cloud.to_mesh()))
            .clone()
    }
}

/// Spawn, despawn and re-slot die entities whenever the stage changes.
#[allow(clippy::too_many_arguments)]
pub fn sync_stage_instances(
    mut commands: Commands,
    stage: Res<DiceStage>,
    settings: Res<StageSettings>,
    mut controller: ResMut<GestureController>,
    mut assets: ResMut<DieAssetCache>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    root_query: Query<Entity, With<DiceStageRoot>>,
    mut instance_query: Query<(Entity, &mut DieInstance, &mut Transform)>,
) {
    if !stage.is_changed() && !settings.is_changed() {
        return;
    }
    let Ok(root) = root_query.single() else {
        return;
    };

    if stage.hidden {
        if controller.is_mounted() {
            controller.unmount();
        }
    } else if !controller.is_mounted() {
        controller.mount();
    }

    let layout = GridLayout::new(settings.columns, settings.cell_size);
    let wanted = stage.instances();
    let slots: HashMap<&InstanceId, (usize, &DieDefinition)> = wanted
        .iter()
        .enumerate()
        .map(|(index, (id, die))| (id, (index, *die)))
        .collect();

    let mut kept: HashSet<InstanceId> = HashSet::new();
    let mut despawned = 0;
    for (entity, mut instance, mut transform) in instance_query.iter_mut() {
        match slots.get(&instance.id) {
            Some((index, die)) if **die == instance.die => {
                instance.index = *index;
                transform.translation = layout.position(*index);
                kept.insert(instance.id.clone());
            }
            _ => {
                commands.entity(entity).despawn();
                despawned += 1;
            }
        }
    }

    let mut spawned = 0;
    for (index, (id, die)) in wanted.iter().enumerate() {
        controller.register(id.clone());
        if kept.contains(id) {
            continue;
        }
        let entity = spawn_die_instance(
            &mut commands,
            id,
            die,
            index,
            layout.position(index),
            &mut assets,
            &mut meshes,
            &mut materials,
            &mut images,
        );
        commands.entity(root).add_child(entity);
        spawned += 1;
    }

    controller.retain(wanted.iter().map(|(id, _)| id));

    if spawned > 0 || despawned > 0 {
        info!(
            "Stage synced in {:?} mode: {} dice ({} spawned, {} removed)",
            stage.mode,
            wanted.len(),
            spawned,
            despawned
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_die_instance(
    commands: &mut Commands,
    id: &InstanceId,
    die: &DieDefinition,
    index: usize,
    position: Vec3,
    assets: &mut DieAssetCache,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
) -> Entity {
    let (body_mesh, edge_mesh) = assets.die_meshes(die.sides, orientation_degrees(&die.id), meshes);

    let color = DieColor::parse_or_gray(&die.color_hex);
    let texture = assets.textures.get_or_create(die.pattern, color, images);
    let surface = SurfaceMaterial::resolve(die, texture.is_some());
    let body_material = materials.add(surface.to_standard_material(texture));
    let edge_material = materials.add(edge_material(color));

    let sparkle = SparkleCloud::from_overrides(die.appearance.as_ref()).map(|cloud| {
        let mesh = assets.sparkle_mesh(&cloud, meshes);
        (mesh, materials.add(cloud.to_material()))
    });

    commands
        .spawn((
            Transform::from_translation(position),
            Visibility::Visible,
            DieInstance {
                id: id.clone(),
                die: die.clone(),
                index,
            },
            Name::new(format!("Die {}", id)),
        ))
        .with_children(|parent| {
            parent.spawn((Mesh3d(body_mesh), MeshMaterial3d(body_material), DieBody));
            parent.spawn((Mesh3d(edge_mesh), MeshMaterial3d(edge_material), DieEdges));
            if let Some((mesh, material)) = sparkle {
                parent.spawn((Mesh3d(mesh), MeshMaterial3d(material), DieSparkle));
            }
        })
        .id()
}
