//! End-to-end tests for the native library pipeline.
//!
//! Each test builds mock library trees in a temp dir, runs the full pipeline
//! and inspects `libs/`, `assetLibs/` and `metadata.txt`.

mod helpers;

use helpers::{assert_file_content, count_dirs, list_files, write_file, TestEnv};
use nativelibs::ops::build_stages;
use nativelibs::pipeline::{layout_for, run, run_with_config};
use nativelibs::plan::parse_plan;
use nativelibs::{CpuType, NativeInputs, NativeLibsError, NativeLibsPlan, StrippedObject};
use regex::Regex;
use std::fs;

// =============================================================================
// Merge priority and filtering
// =============================================================================

#[test]
fn test_earliest_declared_source_wins() {
    let env = TestEnv::new();
    env.write_source("a/armeabi-v7a/lib.so", "from A");
    env.write_source("b/armeabi-v7a/lib.so", "from B");
    env.write_source("b/armeabi-v7a/libonly_b.so", "only B");

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("a"), env.source("b")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_file_content(&layout.libs.join("armeabi-v7a/lib.so"), "from A");
    assert_file_content(&layout.libs.join("armeabi-v7a/libonly_b.so"), "only B");
}

#[test]
fn test_earliest_declared_source_wins_with_filter() {
    let env = TestEnv::new();
    env.write_source("a/x86/lib.so", "from A");
    env.write_source("b/x86/lib.so", "from B");

    let plan = env.plan(
        vec![CpuType::X86],
        NativeInputs {
            lib_dirs: vec![env.source("a"), env.source("b")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_file_content(&layout.libs.join("x86/lib.so"), "from A");
}

#[test]
fn test_filter_skips_missing_abi_silently() {
    let env = TestEnv::new();
    env.write_source("a/armeabi/foo.so", "foo");

    let plan = env.plan(
        vec![CpuType::Arm64],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert!(!layout.libs.join("arm64-v8a").exists());
    assert!(!layout.libs.join("armeabi").exists());
    assert!(list_files(&layout.libs).is_empty());
}

#[test]
fn test_filter_keeps_only_requested_abis() {
    let env = TestEnv::new();
    env.write_source("a/armeabi-v7a/libfoo.so", "v7");
    env.write_source("a/arm64-v8a/libfoo.so", "v8");
    env.write_source("a/x86/libfoo.so", "x86");
    env.write_source("a/x86/nested/libdeep.so", "deep");

    let plan = env.plan(
        vec![CpuType::Arm64, CpuType::X86],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_eq!(
        list_files(&layout.libs),
        vec!["arm64-v8a/libfoo.so", "x86/libfoo.so", "x86/nested/libdeep.so"]
    );
}

#[test]
fn test_unfiltered_copies_every_abi() {
    let env = TestEnv::new();
    env.write_source("a/armeabi/libfoo.so", "arm");
    env.write_source("a/mips/libfoo.so", "mips");

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_eq!(
        list_files(&layout.libs),
        vec!["armeabi/libfoo.so", "mips/libfoo.so"]
    );
}

#[test]
fn test_missing_unfiltered_source_is_not_an_error() {
    let env = TestEnv::new();
    env.write_source("a/x86/libfoo.so", "foo");

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("a"), env.source("does-not-exist")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_file_content(&layout.libs.join("x86/libfoo.so"), "foo");
}

#[test]
fn test_libs_and_assets_stay_disjoint() {
    let env = TestEnv::new();
    env.write_source("libs/x86/libmain.so", "main");
    env.write_source("assets/x86/libasset.so", "asset");

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("libs")],
            asset_lib_dirs: vec![env.source("assets")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_eq!(list_files(&layout.libs), vec!["x86/libmain.so"]);
    assert_eq!(list_files(&layout.asset_libs), vec!["x86/libasset.so"]);
}

// =============================================================================
// Stripped objects
// =============================================================================

#[test]
fn test_stripped_object_beats_bulk_copy() {
    let env = TestEnv::new();
    env.write_source("a/x86/libfoo.so", "unstripped from dir");
    let stripped = env.write_source("strip/libfoo.stripped", "stripped");

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            stripped_libs: vec![StrippedObject::new(&stripped, "libfoo.so", CpuType::X86, "dex")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_file_content(&layout.libs.join("x86/libfoo.so"), "stripped");
}

#[test]
fn test_stripped_assets_land_in_asset_libs() {
    let env = TestEnv::new();
    let obj = env.write_source("strip/libasset.so", "asset");

    let plan = env.plan(
        vec![CpuType::Arm64],
        NativeInputs {
            stripped_lib_assets: vec![StrippedObject::new(&obj, "libasset.so", CpuType::Arm64, "feature")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_file_content(&layout.asset_libs.join("arm64-v8a/libasset.so"), "asset");
    assert!(list_files(&layout.libs).is_empty());
}

#[test]
fn test_missing_stripped_source_fails_with_io_error() {
    let env = TestEnv::new();
    let plan = env.plan(
        vec![],
        NativeInputs {
            stripped_libs: vec![StrippedObject::new(
                env.source("gone.so"),
                "libgone.so",
                CpuType::X86,
                "dex",
            )],
            ..Default::default()
        },
    );

    let err = run(&plan, &env.layout()).unwrap_err();
    assert!(err.root_cause().downcast_ref::<std::io::Error>().is_some());
    assert!(!env.layout().metadata.exists());
}

// =============================================================================
// Disguised executables
// =============================================================================

#[test]
fn test_disguised_executables_are_renamed() {
    let env = TestEnv::new();
    env.write_source("a/payload-disguised-exe", "payload");
    env.write_source("a/a/b/tool-disguised-exe", "tool");

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_eq!(
        list_files(&layout.libs),
        vec!["a/b/libtool.so", "libpayload.so"]
    );
    assert_file_content(&layout.libs.join("libpayload.so"), "payload");
}

#[test]
fn test_renamed_executable_respects_source_priority() {
    let env = TestEnv::new();
    env.write_source("a/x86/libtool.so", "real lib from A");
    env.write_source("b/x86/tool-disguised-exe", "exe from B");

    let plan = env.plan(
        vec![CpuType::X86],
        NativeInputs {
            lib_dirs: vec![env.source("a"), env.source("b")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_eq!(list_files(&layout.libs), vec!["x86/libtool.so"]);
    assert_file_content(&layout.libs.join("x86/libtool.so"), "real lib from A");
}

#[test]
fn test_disguised_assets_are_renamed() {
    let env = TestEnv::new();
    env.write_source("assets/arm64-v8a/helper-disguised-exe", "helper");

    let plan = env.plan(
        vec![CpuType::Arm64],
        NativeInputs {
            asset_lib_dirs: vec![env.source("assets")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_file_content(&layout.asset_libs.join("arm64-v8a/libhelper.so"), "helper");
}

// =============================================================================
// Manifest
// =============================================================================

#[test]
fn test_manifest_lists_every_file_once() {
    let env = TestEnv::new();
    env.write_source("libs/x86/liba.so", "a");
    env.write_source("libs/arm64-v8a/libb.so", "b");
    env.write_source("assets/x86/libc.so", "c");
    fs::create_dir_all(env.source("libs/x86/empty")).unwrap();

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("libs")],
            asset_lib_dirs: vec![env.source("assets")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    let text = fs::read_to_string(&layout.metadata).unwrap();
    assert!(text.ends_with('\n'));
    let line_re = Regex::new(r"^(\S+) ([0-9a-f]{40})$").unwrap();
    let mut paths: Vec<String> = text
        .lines()
        .map(|line| {
            let caps = line_re
                .captures(line)
                .unwrap_or_else(|| panic!("malformed manifest line: {}", line));
            caps[1].to_string()
        })
        .collect();

    let files_on_disk = list_files(&layout.libs).len() + list_files(&layout.asset_libs).len();
    assert_eq!(paths.len(), files_on_disk);
    assert!(count_dirs(&layout.root) > 0);

    paths.sort();
    assert_eq!(
        paths,
        vec!["assetLibs/x86/libc.so", "libs/arm64-v8a/libb.so", "libs/x86/liba.so"]
    );
}

#[test]
fn test_manifest_hash_matches_content() {
    let env = TestEnv::new();
    let obj = env.write_source("strip/libhello.so", "hello");

    let plan = env.plan(
        vec![],
        NativeInputs {
            stripped_libs: vec![StrippedObject::new(&obj, "libhello.so", CpuType::Arm, "dex")],
            ..Default::default()
        },
    );
    let layout = run(&plan, &env.layout()).unwrap();

    assert_file_content(
        &layout.metadata,
        "libs/armeabi/libhello.so aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d\n",
    );
}

#[test]
fn test_second_run_is_byte_identical() {
    let env = TestEnv::new();
    env.write_source("a/x86/liba.so", "a");
    env.write_source("a/x86_64/libb.so", "b");
    env.write_source("b/x86/tool-disguised-exe", "tool");
    let obj = env.write_source("strip/libs.so", "s");

    let plan = env.plan(
        vec![CpuType::X86, CpuType::X86_64],
        NativeInputs {
            lib_dirs: vec![env.source("a"), env.source("b")],
            stripped_libs: vec![StrippedObject::new(&obj, "libs.so", CpuType::X86, "dex")],
            ..Default::default()
        },
    );

    let layout = run(&plan, &env.layout()).unwrap();
    let first = fs::read(&layout.metadata).unwrap();
    let layout = run(&plan, &env.layout()).unwrap();
    let second = fs::read(&layout.metadata).unwrap();

    assert_eq!(first, second);
    assert!(nativelibs::manifest::verify(&layout).unwrap().is_clean());
}

// =============================================================================
// Output tree shape and cleaning
// =============================================================================

#[test]
fn test_root_holds_exactly_three_entries() {
    let env = TestEnv::new();
    env.write_source("a/x86/liba.so", "a");

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            ..Default::default()
        },
    );
    let layout = run_with_config(&plan, &env.config()).unwrap();

    assert_eq!(
        layout.root,
        env.out_dir.join("bin/apps/demo/__native_dex_app__")
    );
    let mut names: Vec<String> = fs::read_dir(&layout.root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["assetLibs", "libs", "metadata.txt"]);
}

#[test]
fn test_stale_output_is_removed() {
    let env = TestEnv::new();
    env.write_source("a/x86/liba.so", "a");
    let layout = env.layout();
    write_file(&layout.libs.join("x86/libstale.so"), "stale");
    write_file(&layout.asset_libs.join("x86/libstale.so"), "stale");
    write_file(&layout.root.join("leftover.txt"), "stale");

    let plan = env.plan(
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            ..Default::default()
        },
    );
    run(&plan, &layout).unwrap();

    assert_eq!(list_files(&layout.libs), vec!["x86/liba.so"]);
    assert!(list_files(&layout.asset_libs).is_empty());
    assert!(!layout.root.join("leftover.txt").exists());
    let text = fs::read_to_string(&layout.metadata).unwrap();
    assert!(!text.contains("stale"));
}

// =============================================================================
// Failure modes
// =============================================================================

#[test]
fn test_no_inputs_fails_before_touching_disk() {
    let env = TestEnv::new();
    let err = NativeLibsPlan::new(helpers::unit(), "dex", vec![CpuType::X86], NativeInputs::default())
        .unwrap_err();
    assert!(matches!(err, NativeLibsError::NoNativeInputs));
    assert!(!env.out_dir.exists());

    let json = r#"{ "build_unit": "//apps/demo:app", "module": "dex" }"#;
    let err = parse_plan(json, &env.sources, &env.config()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<NativeLibsError>(),
        Some(NativeLibsError::NoNativeInputs)
    ));
    assert!(!env.out_dir.exists());
}

#[test]
fn test_unmapped_cpu_filter_fails_before_cleaning() {
    let env = TestEnv::new();
    env.write_source("a/x86/liba.so", "a");
    let layout = env.layout();
    write_file(&layout.libs.join("x86/libprevious.so"), "previous");

    let plan = env.plan(
        vec![CpuType::Mips64],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            ..Default::default()
        },
    );
    assert!(build_stages(&plan, &layout).is_err());

    let err = run(&plan, &layout).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<NativeLibsError>(),
        Some(NativeLibsError::UnmappedCpuType(CpuType::Mips64))
    ));
    assert!(layout.libs.join("x86/libprevious.so").exists());
}

#[test]
fn test_unmapped_filter_is_unused_without_directory_sources() {
    let env = TestEnv::new();
    let stripped = env.write_source("strip/libfoo.so", "stripped");
    let layout = env.layout();

    let plan = env.plan(
        vec![CpuType::Mips64],
        NativeInputs {
            stripped_libs: vec![StrippedObject::new(stripped, "libfoo.so", CpuType::X86, "dex")],
            ..Default::default()
        },
    );
    run(&plan, &layout).unwrap();

    assert_file_content(&layout.libs.join("x86/libfoo.so"), "stripped");
}

#[test]
fn test_module_cannot_escape_scratch_dir() {
    let env = TestEnv::new();
    env.write_source("a/x86/liba.so", "a");
    let precious = env.out_dir.join("victim_app__/precious.txt");
    write_file(&precious, "keep");

    let err = NativeLibsPlan::new(
        helpers::unit(),
        "x/../../../../victim",
        vec![],
        NativeInputs {
            lib_dirs: vec![env.source("a")],
            ..Default::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, NativeLibsError::InvalidModule(_)));
    assert!(err.is_configuration_error());
    assert_file_content(&precious, "keep");
}

// =============================================================================
// Plan files
// =============================================================================

#[test]
fn test_plan_file_round_trip_through_pipeline() {
    let env = TestEnv::new();
    env.write_source("prebuilt/arm64-v8a/libfoo.so", "foo");
    env.write_source("prebuilt/x86/libfoo.so", "foo-x86");
    env.write_source("strip/libbar.so", "bar");

    let json = r#"{
        "build_unit": "//apps/demo:app",
        "module": "dex",
        "cpu_filters": ["arm64"],
        "native_lib_dirs": ["prebuilt"],
        "stripped_libs": [
            { "source": "strip/libbar.so", "name": "libbar.so", "cpu": "arm64" }
        ]
    }"#;
    let plan = parse_plan(json, &env.sources, &env.config()).unwrap();
    let layout = run_with_config(&plan, &env.config()).unwrap();

    assert_eq!(layout, layout_for(&plan, &env.config()));
    assert_eq!(
        list_files(&layout.libs),
        vec!["arm64-v8a/libbar.so", "arm64-v8a/libfoo.so"]
    );
}
