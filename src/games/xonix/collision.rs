use super::enemy::{Enemy, EnemyKind};
use super::grid::TerritoryGrid;
use super::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Player ran into its own trail
    SelfIntersection,
    /// Player touched an enemy
    EnemyContact,
    /// A roaming enemy touched the trail
    TrailCut,
}

/// Whether any enemy is close enough to kill the player this tick.
///
/// Roaming enemies only count while the player is drawing. Patrolling enemies
/// count everywhere, the border included. A shielded player is never hit.
pub fn check_enemy_collision(player: &Player, enemies: &[Enemy], slack: f32) -> bool {
    if player.shielded {
        return false;
    }

    enemies.iter().any(|enemy| {
        let threshold = (player.size + enemy.size) / 2.0 + slack;
        if player.position.distance(enemy.position) >= threshold {
            return false;
        }
        match enemy.kind {
            EnemyKind::Roaming => player.is_drawing(),
            EnemyKind::Patrolling => true,
        }
    })
}

/// Whether a roaming enemy is touching the player's trail.
pub fn check_trail_collision(player: &Player, enemy: &Enemy, grid: &TerritoryGrid) -> bool {
    !player.shielded && enemy.kind == EnemyKind::Roaming && enemy.touches_trail(grid)
}
