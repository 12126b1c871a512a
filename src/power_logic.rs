/// Decide whether the display should be awake for the current idle time.
///
/// Sleep engages only once the idle counter strictly exceeds the timeout,
/// so a counter sitting exactly at the threshold still renders.
pub fn display_awake(idle_secs: u32, timeout_secs: u32) -> bool {
    idle_secs <= timeout_secs
}
