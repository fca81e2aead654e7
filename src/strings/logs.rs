pub fn config_loaded(user: &str) -> String {
    format!("Loaded configuration for user: {user}")
}

pub const LOGIN_SUCCESS: &str = "Logged in successfully!";

pub fn setting_display_name(name: &str) -> String {
    format!("Setting display name to: {name}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub fn relay_room_joined(room: &str) -> String {
    format!("Relay destination joined: {room}")
}

pub fn rejected_config_account(handle: &str) -> String {
    format!("Ignoring invalid handle in monitor.accounts: {handle:?}")
}

pub fn monitor_seeded(accounts: usize, keywords: usize) -> String {
    format!("Monitoring {accounts} account(s) with {keywords} keyword(s)")
}

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id:?}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub const SHUTDOWN: &str = "Shutting down...";

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}
