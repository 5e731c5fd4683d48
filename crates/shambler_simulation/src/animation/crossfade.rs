//! Animator: текущий клип + cross-fade
//!
//! Render collaborator сам проигрывает клипы, здесь только бухгалтерия:
//! какой клип играет, с каким весом, на каком времени.
//!
//! Переход: новый клип стартует с time = 0, вес 0 → 1 за `duration`,
//! старый 1 → 0 за то же время и потом выбрасывается.
//! Очереди переходов нет: смена цели посреди fade перезапускает envelope,
//! текущая цель становится outgoing, более старый outgoing выбрасывается сразу.

use bevy::prelude::*;

use super::clips::{ClipRole, ClipSet};

/// Клип, который сейчас играет
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlayback {
    pub role: ClipRole,
    /// Локальное время клипа (секунды)
    pub time: f32,
    pub weight: f32,
}

impl ClipPlayback {
    fn start(role: ClipRole, weight: f32) -> Self {
        Self {
            role,
            time: 0.0,
            weight,
        }
    }
}

/// Cross-fade в процессе
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub elapsed: f32,
    pub duration: f32,
    /// Вес outgoing клипа в момент старта fade
    pub outgoing_from: f32,
}

impl Fade {
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// Анимационное состояние chaser-а
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Animator {
    pub clips: ClipSet,
    pub active: ClipPlayback,
    pub outgoing: Option<ClipPlayback>,
    pub fade: Option<Fade>,
}

impl Animator {
    /// Стартуем с Idle на полном весе. Без Idle клипа animator не создаётся.
    pub fn new(clips: ClipSet) -> Option<Self> {
        if !clips.has(ClipRole::Idle) {
            return None;
        }

        Some(Self {
            clips,
            active: ClipPlayback::start(ClipRole::Idle, 1.0),
            outgoing: None,
            fade: None,
        })
    }

    pub fn current_role(&self) -> ClipRole {
        self.active.role
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Начать переход на роль. false: роль уже текущая или у модели нет такого клипа.
    pub fn transition_to(&mut self, role: ClipRole, duration: f32) -> bool {
        if role == self.active.role || !self.clips.has(role) {
            return false;
        }

        let previous = self.active;
        self.active = ClipPlayback::start(role, 0.0);
        // Старый outgoing (если fade не закончился) выбрасываем
        self.outgoing = Some(previous);
        self.fade = Some(Fade {
            elapsed: 0.0,
            duration,
            outgoing_from: previous.weight,
        });

        if duration <= 0.0 {
            self.finish_fade();
        }

        true
    }

    /// Продвинуть время клипов и fade
    pub fn advance(&mut self, dt: f32) {
        self.active.time += dt;
        if let Some(outgoing) = self.outgoing.as_mut() {
            outgoing.time += dt;
        }

        let Some(fade) = self.fade.as_mut() else {
            return;
        };

        fade.elapsed += dt;
        let t = fade.progress();
        let outgoing_from = fade.outgoing_from;

        self.active.weight = t;
        if let Some(outgoing) = self.outgoing.as_mut() {
            outgoing.weight = outgoing_from * (1.0 - t);
        }

        if t >= 1.0 {
            self.finish_fade();
        }
    }

    fn finish_fade(&mut self) {
        self.active.weight = 1.0;
        self.outgoing = None;
        self.fade = None;
    }

    /// (имя клипа, вес, время) для renderer-а
    pub fn weights(&self) -> Vec<(&str, f32, f32)> {
        let mut out = Vec::with_capacity(2);
        for playback in std::iter::once(&self.active).chain(self.outgoing.iter()) {
            if let Some(name) = self.clips.get(playback.role) {
                out.push((name, playback.weight, playback.time));
            }
        }
        out
    }
}
