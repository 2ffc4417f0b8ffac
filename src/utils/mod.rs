// SwiftDoc Utilities Module
//
// Path handling and ignore-pattern support shared by the file and module
// aggregators.

/// Path conversion utilities (absolute → relative Unix-style)
pub mod paths;

/// File ignore pattern utilities (.swiftdocignore support)
pub mod ignore;
