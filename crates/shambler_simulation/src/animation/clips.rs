//! Clip roles: какие клипы модели играют Idle / Run / Attack / Death
//!
//! Имена клипов в моделях длинные ("CharacterArmature|Skeleton_Idle" и т.п.),
//! поэтому роль ищем по подстроке, ОДИН раз при загрузке модели.
//! Роль без клипа: просто отсутствует, не ошибка.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ClipRole {
    Idle,
    Run,
    Attack,
    /// Резолвится из модели, но ни одна система её не включает (смерти chaser-ов нет)
    Death,
}

impl ClipRole {
    pub const ALL: [ClipRole; 4] = [ClipRole::Idle, ClipRole::Run, ClipRole::Attack, ClipRole::Death];

    /// Подстрока, по которой ищем клип
    pub fn pattern(&self) -> &'static str {
        match self {
            ClipRole::Idle => "Idle",
            ClipRole::Run => "Run",
            ClipRole::Attack => "Attack",
            ClipRole::Death => "Death",
        }
    }

    fn index(&self) -> usize {
        match self {
            ClipRole::Idle => 0,
            ClipRole::Run => 1,
            ClipRole::Attack => 2,
            ClipRole::Death => 3,
        }
    }
}

/// Маппинг роль → имя клипа
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipSet {
    clips: [Option<String>; 4],
}

impl ClipSet {
    /// Первый клип, чьё имя содержит pattern роли (case-sensitive, как в экспортах моделей)
    pub fn resolve<S: AsRef<str>>(clip_names: &[S]) -> Self {
        let mut set = Self::default();

        for role in ClipRole::ALL {
            set.clips[role.index()] = clip_names
                .iter()
                .map(AsRef::as_ref)
                .find(|name| name.contains(role.pattern()))
                .map(str::to_string);
        }

        set
    }

    pub fn get(&self, role: ClipRole) -> Option<&str> {
        self.clips[role.index()].as_deref()
    }

    pub fn has(&self, role: ClipRole) -> bool {
        self.get(role).is_some()
    }

    pub fn missing(&self) -> Vec<ClipRole> {
        ClipRole::ALL.into_iter().filter(|role| !self.has(*role)).collect()
    }
}
