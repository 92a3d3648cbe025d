// this file contains enums found all around the codebase
// they act as toggles for certain features, so they can be
// enabled if selected by the user

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum SkipMode {
    ShowPrompts,
    HidePrompts,
}

// where the key comes from, in order of priority
#[derive(PartialEq, Clone, Debug)]
pub enum Key {
    Hex(String),
    Keyfile(String),
    Env,
    Generate,
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    Encrypt,
    Decrypt,
}
