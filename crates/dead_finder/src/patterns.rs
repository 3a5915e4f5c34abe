//! The name-based entry-point pattern list: path regexes for files that
//! are externally reachable by convention rather than by import. Each
//! entry pairs the regex with the reason recorded in the scan result.
//!
//! Checked against root-relative POSIX paths via one `RegexSet`; the
//! first matching pattern wins.

use lazy_static::lazy_static;
use regex::RegexSet;

pub const NAME_PATTERNS: &[(&str, &str)] = &[
    // test trees and test files
    (r"(^|/)__(tests|mocks|snapshots|fixtures)__/", "test directory"),
    (r"(^|/)(tests?|spec|specs)/", "test directory"),
    (r"(^|/)(e2e|integration-tests?|acceptance)/", "test directory"),
    (r"(^|/)(cypress|playwright|selenium)/", "test directory"),
    (r"\.(test|spec)\.[cm]?[jt]sx?$", "test file"),
    (r"\.(test|spec)\.(py|rb|php)$", "test file"),
    (r"_test\.(go|py|rb|ex|exs|zig)$", "test file"),
    (r"(^|/)test_[^/]+\.py$", "test file"),
    (r"(^|/)conftest\.py$", "pytest fixture module"),
    (r"(Test|Tests|IT)\.(java|kt|scala)$", "test class"),
    (r"(Spec|Test|Tests)\.(swift|vb)$", "test class"),
    (r"_spec\.rb$", "test file"),
    (r"(^|/)src/test/", "test source root"),
    (r"(^|/)(androidTest|unitTest)/", "test source root"),
    (r"(^|/)testdata/", "test data directory"),
    // configuration files
    (r"\.config\.[cm]?[jt]sx?$", "build configuration"),
    (r"(^|/)\.[^/]+rc\.[cm]?js$", "runtime configuration"),
    (r"(^|/)(babel|jest|vitest|karma|protractor)\.conf(ig)?\.[cm]?[jt]s$", "test runner configuration"),
    (r"(^|/)(gulpfile|gruntfile)\.[cm]?[jt]s$", "task runner configuration"),
    (r"(^|/)(webpack|rollup|vite|esbuild|tsup|metro|snowpack)\.[\w.]*[cm]?[jt]s$", "bundler configuration"),
    (r"(^|/)(setup|versioneer)\.py$", "packaging script"),
    (r"(^|/)(settings|config|configuration)\.py$", "configuration module"),
    (r"(^|/)(gunicorn|uwsgi)[^/]*\.py$", "server configuration"),
    (r"(^|/)(fabfile|noxfile|tasks)\.py$", "task runner module"),
    (r"(^|/)knexfile\.[jt]s$", "database configuration"),
    (r"(^|/)ormconfig\.[jt]s$", "database configuration"),
    (r"(^|/)drizzle\.config\.[jt]s$", "database configuration"),
    (r"(^|/)config/.*\.(js|ts|py|rb|php|ex|exs)$", "configuration directory"),
    // type declarations
    (r"\.d\.[cm]?ts$", "type declarations"),
    (r"(^|/)typings?/", "type declarations directory"),
    (r"(^|/)@types/", "type declarations directory"),
    // file-based routing
    (r"(^|/)pages/.*\.[cm]?[jt]sx?$", "file-based route"),
    (r"(^|/)app/.*/?(page|layout|route|loading|error|not-found|template|default)\.[jt]sx?$", "file-based route"),
    (r"(^|/)(routes|routers?)/.*\.[cm]?[jt]sx?$", "route module"),
    (r"(^|/)api/.*\.[cm]?[jt]sx?$", "api route"),
    (r"(^|/)middleware\.[jt]s$", "middleware entry"),
    (r"(^|/)app/(controllers|models|views|helpers|jobs|mailers|channels)/", "mvc convention directory"),
    (r"(^|/)(controllers|handlers|endpoints|resources)/.*\.py$", "web handler module"),
    // scripts and tools
    (r"(^|/)(scripts?|tools?|tasks|automation|ci|devtools)/", "script directory"),
    (r"(^|/)bin/", "bin directory"),
    (r"(^|/)\.github/", "ci workflow directory"),
    (r"(^|/)(deploy|release|publish)[^/]*\.[jt]s$", "release script"),
    // workers
    (r"(^|/)workers?/", "worker directory"),
    (r"(service-?worker|sw)\.[cm]?[jt]s$", "service worker"),
    (r"\.worker\.[cm]?[jt]sx?$", "worker module"),
    (r"(^|/)(jobs|queues|consumers|subscribers)/", "background job directory"),
    // storybook and docs examples
    (r"\.stories\.[cm]?[jt]sx?$", "storybook story"),
    (r"(^|/)\.storybook/", "storybook configuration"),
    (r"(^|/)(stories|storybook)/", "storybook directory"),
    (r"(^|/)(docs?|documentation|website|examples?|demos?|samples?|playground)/", "documentation or example"),
    // benchmarks and codemods
    (r"(^|/)(benchmarks?|benches|perf|profiling)/", "benchmark directory"),
    (r"_bench\.(go|rs|zig)$", "benchmark file"),
    (r"\.bench\.[jt]s$", "benchmark file"),
    (r"(^|/)codemods?/", "codemod directory"),
    // migrations, seeds, fixtures, templates
    (r"(^|/)(migrations?|migrate)/", "migration directory"),
    (r"(^|/)db/(migrate|seeds?)/", "migration directory"),
    (r"(^|/)alembic/", "migration directory"),
    (r"(^|/)(seeders?|seeds?|factories)/", "seed directory"),
    (r"(^|/)(fixtures?|templates?|blueprints|scaffolds?|generators)/", "template directory"),
    (r"(^|/)(mocks?|stubs?)/", "mock directory"),
    // serverless and static hosting
    (r"(^|/)(functions|lambdas?|edge-functions)/", "serverless function directory"),
    (r"(^|/)(netlify|supabase)/functions/", "serverless function directory"),
    (r"(^|/)serverless\.[jt]s$", "serverless configuration"),
    (r"(^|/)(public|static|assets)/", "static asset directory"),
    (r"(^|/)(layouts?|_layouts|partials|views|includes)/", "template layout directory"),
    // javascript / typescript entries
    (r"(^|/)(index|main|app|server|cli|entry)\.[cm]?[jt]sx?$", "conventional entry file"),
    (r"(^|/)src/(index|main|app|server|entry)\.[cm]?[jt]sx?$", "conventional entry file"),
    (r"(^|/)(packages|apps|libs|services|modules)/[^/]+/src/(index|main)\.[cm]?[jt]sx?$", "package entry file"),
    (r"(^|/)(packages|apps|libs|services|modules)/[^/]+/(index|main)\.[cm]?[jt]sx?$", "package entry file"),
    (r"(^|/)electron\.[cm]?js$", "electron entry"),
    (r"(^|/)(preload|renderer|background)\.[cm]?[jt]s$", "electron process entry"),
    // python entries
    (r"(^|/)__main__\.py$", "python package main"),
    (r"(^|/)(main|app|application|run|cli|manage|wsgi|asgi|celery)\.py$", "conventional python entry"),
    (r"(^|/)(management/commands|cli_commands)/.*\.py$", "cli command module"),
    // go entries
    (r"(^|/)main\.go$", "go main file"),
    (r"(^|/)cmd/", "go command directory"),
    (r"(^|/)internal/tools/", "go tooling directory"),
    // rust entries
    (r"(^|/)src/(main|lib)\.rs$", "rust crate root"),
    (r"(^|/)src/bin/[^/]+\.rs$", "rust binary target"),
    (r"(^|/)(examples|benches)/[^/]+\.rs$", "rust example or bench"),
    (r"(^|/)tests/[^/]+\.rs$", "rust integration test"),
    (r"(^|/)build\.rs$", "rust build script"),
    // java / kotlin entries
    (r"(^|/)(Main|Application|App|Launcher)\.(java|kt)$", "jvm entry class"),
    (r"Application\.(java|kt)$", "jvm application class"),
    (r"(^|/)src/main/kotlin/.*MainKt\.kt$", "kotlin main"),
    // php entries
    (r"(^|/)(index|bootstrap|autoload)\.php$", "php entry file"),
    (r"(^|/)public/.*\.php$", "php web root"),
    (r"(^|/)(cron|console|artisan-commands)/.*\.php$", "php command"),
    // ruby entries
    (r"\.gemspec$", "gemspec"),
    (r"(^|/)Rakefile$", "rake entry"),
    (r"(^|/)lib/tasks/.*\.rake$", "rake task"),
    (r"(^|/)app/.*\.rb$", "rails application file"),
    // swift entries
    (r"(^|/)(main|AppDelegate|SceneDelegate|App)\.swift$", "swift entry file"),
    (r"(^|/)Package\.swift$", "swift package manifest"),
    // scala entries
    (r"(^|/)(Main|Boot|Server)\.scala$", "scala entry class"),
    // elixir entries
    (r"(^|/)mix\.exs$", "mix project file"),
    (r"(^|/)lib/[^/]+/application\.ex$", "otp application"),
    (r"(^|/)lib/[^/]+_web/", "phoenix web directory"),
    (r"(^|/)priv/repo/migrations/", "ecto migration"),
    // erlang entries
    (r"_(app|sup)\.erl$", "otp callback module"),
    (r"(^|/)rebar\.config\.script$", "rebar configuration"),
    // ocaml / fsharp entries
    (r"(^|/)(main|cli)\.ml$", "ocaml entry file"),
    (r"(^|/)Program\.fsx?$", "fsharp entry file"),
    (r"\.fsx$", "fsharp script"),
    // perl entries
    (r"(^|/)(cgi-bin|script)/", "perl script directory"),
    (r"\.psgi$", "psgi application"),
    // zig entries
    (r"(^|/)src/main\.zig$", "zig entry file"),
    (r"(^|/)build\.zig$", "zig build script"),
    // vb.net entries
    (r"(^|/)Program\.vb$", "vb.net entry file"),
    (r"(^|/)My Project/", "vb.net project metadata"),
];

lazy_static! {
    pub static ref NAME_PATTERN_SET: RegexSet =
        RegexSet::new(NAME_PATTERNS.iter().map(|(pattern, _)| *pattern))
            .expect("entry-point name patterns are valid regexes");
}

/// First matching pattern's reason, if any.
pub fn match_name_pattern(rel_path: &str) -> Option<&'static str> {
    NAME_PATTERN_SET
        .matches(rel_path)
        .iter()
        .next()
        .map(|idx| NAME_PATTERNS[idx].1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn representative_paths_match() {
        let cases = [
            ("src/components/Button.test.tsx", Some("test file")),
            ("pkg/util/util_test.go", Some("test file")),
            ("src/pages/about.tsx", Some("file-based route")),
            ("db/migrate/20240101_init.rb", Some("migration directory")),
            ("src/main.rs", Some("rust crate root")),
            ("cmd/server/run.go", Some("go command directory")),
            ("widget.gemspec", Some("gemspec")),
            ("src/core/engine.ts", None),
        ];
        for (path, expected) in cases {
            assert_eq!(match_name_pattern(path), expected, "path: {path}");
        }
    }

    #[test]
    fn first_pattern_wins() {
        // both a test directory and a .test file; the directory pattern
        // appears first in the list
        assert_eq!(
            match_name_pattern("tests/unit/helper.test.ts"),
            Some("test directory")
        );
    }
}
