//! Die name labels
//!
//! UI text nodes that track their die's projected screen position. Labels
//! are created lazily for dice that lack one and dropped once their die is
//! gone.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::dice3d::types::*;

const LABEL_WIDTH: f32 = 140.0;
const LABEL_FONT_SIZE: f32 = 12.0;
/// World units above the die center, before stage scaling
const LABEL_LIFT: f32 = 1.25;

fn label_color(mode: StageMode) -> Color {
    match mode {
        StageMode::Selection => Color::WHITE,
        StageMode::Library => Color::srgb_u8(0xd1, 0xd5, 0xdb),
    }
}

fn spawn_label(commands: &mut Commands, die_entity: Entity, text: &str, color: Color) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(LABEL_WIDTH),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Visibility::Hidden,
            DieLabel { die_entity },
            Name::new(format!("DieLabel {}", text)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(text),
                TextFont {
                    font_size: LABEL_FONT_SIZE,
                    ..default()
                },
                TextColor(color),
            ));
        });
}

pub fn update_die_labels(
    mut commands: Commands,
    stage: Res<DiceStage>,
    settings: Res<StageSettings>,
    camera_query: Query<(&Camera, &GlobalTransform), With<StageCamera>>,
    dice_query: Query<(Entity, &DieInstance, &GlobalTransform)>,
    mut label_query: Query<(Entity, &DieLabel, &mut Node, &mut Visibility)>,
) {
    if !settings.show_labels || stage.hidden {
        for (entity, ..) in label_query.iter() {
            commands.entity(entity).despawn();
        }
        return;
    }

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let mut labelled = HashSet::new();
    for (entity, label, mut node, mut visibility) in label_query.iter_mut() {
        let Ok((_, _, die_transform)) = dice_query.get(label.die_entity) else {
            commands.entity(entity).despawn();
            continue;
        };
        labelled.insert(label.die_entity);

        let lift = LABEL_LIFT * die_transform.compute_transform().scale.y;
        let anchor = die_transform.translation() + Vec3::Y * lift;
        match camera.world_to_viewport(camera_transform, anchor) {
            Ok(screen) => {
                node.left = Val::Px(screen.x - LABEL_WIDTH / 2.0);
                node.top = Val::Px(screen.y);
                *visibility = Visibility::Inherited;
            }
            Err(_) => *visibility = Visibility::Hidden,
        }
    }

    let color = label_color(stage.mode);
    for (entity, instance, _) in dice_query.iter() {
        if !labelled.contains(&entity) {
            spawn_label(&mut commands, entity, instance.die.display_name(), color);
        }
    }
}
