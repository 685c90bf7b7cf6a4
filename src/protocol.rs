pub mod xonix {
    /// Player intent, sent by the input source.
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct XonixInput {
        #[prost(enumeration = "Direction", tag = "1")]
        pub direction: i32,
        /// Flips between playing and paused
        #[prost(bool, tag = "2")]
        pub toggle_pause: bool,
    }

    /// Read-only view of the field after a tick.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct XonixSnapshot {
        #[prost(uint64, tag = "1")]
        pub tick: u64,
        #[prost(uint32, tag = "2")]
        pub level: u32,
        #[prost(uint64, tag = "3")]
        pub score: u64,
        #[prost(uint32, tag = "4")]
        pub lives: u32,
        #[prost(float, tag = "5")]
        pub fill_fraction: f32,
        #[prost(float, tag = "6")]
        pub fill_required: f32,
        #[prost(enumeration = "Phase", tag = "7")]
        pub phase: i32,
        #[prost(uint32, tag = "8")]
        pub cols: u32,
        #[prost(uint32, tag = "9")]
        pub rows: u32,
        /// One byte per cell, row-major: 0 empty, 1 claimed, 2 border, 3 trail
        #[prost(bytes = "vec", tag = "10")]
        pub cells: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, optional, tag = "11")]
        pub player: ::core::option::Option<PlayerSnapshot>,
        #[prost(message, repeated, tag = "12")]
        pub enemies: ::prost::alloc::vec::Vec<EnemySnapshot>,
        #[prost(message, repeated, tag = "13")]
        pub power_ups: ::prost::alloc::vec::Vec<PowerUpSnapshot>,
        #[prost(message, repeated, tag = "14")]
        pub effects: ::prost::alloc::vec::Vec<EffectSnapshot>,
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct PlayerSnapshot {
        #[prost(float, tag = "1")]
        pub x: f32,
        #[prost(float, tag = "2")]
        pub y: f32,
        #[prost(enumeration = "Direction", tag = "3")]
        pub direction: i32,
        #[prost(bool, tag = "4")]
        pub drawing: bool,
        #[prost(uint32, tag = "5")]
        pub trail_length: u32,
        #[prost(bool, tag = "6")]
        pub shielded: bool,
        #[prost(bool, tag = "7")]
        pub speed_boost: bool,
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct EnemySnapshot {
        #[prost(enumeration = "EnemyKind", tag = "1")]
        pub kind: i32,
        #[prost(float, tag = "2")]
        pub x: f32,
        #[prost(float, tag = "3")]
        pub y: f32,
        #[prost(bool, tag = "4")]
        pub frozen: bool,
        #[prost(bool, tag = "5")]
        pub slowed: bool,
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct PowerUpSnapshot {
        #[prost(enumeration = "PowerUpKind", tag = "1")]
        pub kind: i32,
        #[prost(float, tag = "2")]
        pub x: f32,
        #[prost(float, tag = "3")]
        pub y: f32,
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct EffectSnapshot {
        #[prost(enumeration = "PowerUpKind", tag = "1")]
        pub kind: i32,
        #[prost(uint64, tag = "2")]
        pub remaining_ms: u64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Direction {
        None = 0,
        Up = 1,
        Down = 2,
        Left = 3,
        Right = 4,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Phase {
        Playing = 0,
        Cooldown = 1,
        LevelComplete = 2,
        GameOver = 3,
        Paused = 4,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum EnemyKind {
        Roaming = 0,
        Patrolling = 1,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum PowerUpKind {
        Speed = 0,
        Freeze = 1,
        Shield = 2,
        SlowMo = 3,
        Life = 4,
    }
}
