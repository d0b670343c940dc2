use serenity::all::Permissions;

/// Permissions that only mean something in voice channels.
pub const VOICE_PERMISSIONS: Permissions = Permissions::from_bits_truncate(
    Permissions::CONNECT.bits()
        | Permissions::SPEAK.bits()
        | Permissions::MUTE_MEMBERS.bits()
        | Permissions::DEAFEN_MEMBERS.bits()
        | Permissions::MOVE_MEMBERS.bits()
        | Permissions::USE_VAD.bits()
        | Permissions::PRIORITY_SPEAKER.bits()
        | Permissions::STREAM.bits(),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionScope {
    /// Permissions resolved in a single channel. Denied voice permissions are left out.
    Channel,
    Guild,
}

/// Named permission flags split into granted and denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSummary {
    pub allowed: Vec<String>,
    pub denied: Vec<String>,
}

impl PermissionSummary {
    pub fn evaluate(permissions: Permissions, scope: PermissionScope) -> Self {
        let mut allowed = Vec::new();
        let mut denied = Vec::new();

        for (name, flag) in Permissions::all().iter_names() {
            let name = name.to_ascii_lowercase();

            if permissions.contains(flag) {
                allowed.push(name);
            } else if scope == PermissionScope::Guild || !VOICE_PERMISSIONS.intersects(flag) {
                denied.push(name);
            }
        }

        Self { allowed, denied }
    }

    pub fn allowed_block(&self) -> String {
        block(&self.allowed)
    }

    pub fn denied_block(&self) -> String {
        block(&self.denied)
    }
}

fn block(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn all_names() -> HashSet<String> {
        Permissions::all()
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect()
    }

    fn voice_names() -> HashSet<String> {
        VOICE_PERMISSIONS
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect()
    }

    fn samples() -> Vec<Permissions> {
        vec![
            Permissions::empty(),
            Permissions::all(),
            Permissions::SEND_MESSAGES | Permissions::CONNECT | Permissions::VIEW_CHANNEL,
            Permissions::from_bits_truncate(0x5555_5555_5555),
            Permissions::from_bits_truncate(0x2AAA_AAAA_AAAA),
        ]
    }

    #[test]
    fn guild_partitions_cover_every_flag() {
        for permissions in samples() {
            let summary = PermissionSummary::evaluate(permissions, PermissionScope::Guild);
            let allowed: HashSet<_> = summary.allowed.iter().cloned().collect();
            let denied: HashSet<_> = summary.denied.iter().cloned().collect();

            assert!(allowed.is_disjoint(&denied));
            assert_eq!(&allowed | &denied, all_names());
        }
    }

    #[test]
    fn channel_partitions_skip_denied_voice_flags() {
        for permissions in samples() {
            let summary = PermissionSummary::evaluate(permissions, PermissionScope::Channel);
            let allowed: HashSet<_> = summary.allowed.iter().cloned().collect();
            let denied: HashSet<_> = summary.denied.iter().cloned().collect();

            assert!(allowed.is_disjoint(&denied));
            assert!(denied.is_disjoint(&voice_names()));

            let denied_voice: HashSet<_> = voice_names().difference(&allowed).cloned().collect();
            let expected: HashSet<_> = all_names().difference(&denied_voice).cloned().collect();
            assert_eq!(&allowed | &denied, expected);
        }
    }

    #[test]
    fn granted_voice_flag_is_listed_in_channel_scope() {
        let summary = PermissionSummary::evaluate(Permissions::CONNECT, PermissionScope::Channel);

        assert_eq!(summary.allowed, vec!["connect".to_string()]);
        assert!(!summary.denied.contains(&"speak".to_string()));
        assert!(summary.denied.contains(&"send_messages".to_string()));
    }

    #[test]
    fn empty_blocks_read_none() {
        let summary = PermissionSummary::evaluate(Permissions::all(), PermissionScope::Guild);

        assert_eq!(summary.denied_block(), "None");
        assert!(summary.allowed_block().contains("administrator"));
        assert!(summary.allowed_block().contains('\n'));
    }
}
