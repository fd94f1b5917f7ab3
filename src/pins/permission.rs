use serenity::all::Permissions;

/// Pinning and unpinning is open to administrators and to anyone who may
/// manage messages in the origin channel. `permissions` must already be
/// resolved for that channel, overwrites included.
pub fn may_manage_pins(permissions: Permissions) -> bool {
    permissions.administrator() || permissions.manage_messages()
}
