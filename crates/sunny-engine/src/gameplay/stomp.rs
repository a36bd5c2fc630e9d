use crate::components::collider::Aabb;

/// How a player-enemy overlap is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The player came down on top of the enemy.
    Stomp,
    /// Any other contact: the player gets hurt.
    Hurt,
}

/// A stomp needs a wide, shallow overlap with the player's centre above the
/// enemy's centre (Y-down).
pub fn judge_stomp(player: &Aabb, enemy: &Aabb) -> Contact {
    let overlap = player.overlap(enemy);
    if overlap.x > overlap.y && player.center().y < enemy.center().y {
        Contact::Stomp
    } else {
        Contact::Hurt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn boxed(x: f32, y: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::splat(16.0))
    }

    #[test]
    fn landing_on_top_is_a_stomp() {
        assert_eq!(judge_stomp(&boxed(2.0, -14.0), &boxed(0.0, 0.0)), Contact::Stomp);
    }

    #[test]
    fn side_contact_hurts() {
        assert_eq!(judge_stomp(&boxed(-14.0, -2.0), &boxed(0.0, 0.0)), Contact::Hurt);
    }

    #[test]
    fn hitting_from_below_hurts() {
        assert_eq!(judge_stomp(&boxed(1.0, 14.0), &boxed(0.0, 0.0)), Contact::Hurt);
    }
}
