// Crate entry point. Declare and expose modules so tests and the binary can import them.
//
// Layout
// - core: entities, field rules, search and merge rules, persistence ports. No input or output.
// - application: lifecycle services orchestrating core rules and ports.
// - adapters: in memory repositories and the HTTP inbound layer.
// - shell: configuration and composition root.

pub mod core {
    pub mod merge;
    pub mod ports;
    pub mod training;
    pub mod user;
    pub mod validation;
}

pub mod application {
    pub mod errors;
    pub mod training_service;
    pub mod user_service;
}

pub mod adapters {
    pub mod in_memory {
        pub mod in_memory_training_repository;
        pub mod in_memory_user_repository;
    }
    pub mod inbound {
        pub mod http {
            pub mod errors;
            pub mod trainings;
            pub mod users;
        }
    }
}

pub mod shell;
