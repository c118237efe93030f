use std::{fs, path::Path};

use regex::Regex;

// A test file is a list of cases:
//
//   <cmd> [key=val | key=(v1, v2) | flag]...
//   [input lines]
//   ----
//   <expected output lines>
//   <blank line>
//
// `#` starts a comment line between cases.
#[derive(Default)]
pub struct TestData {
    pos: String,
    cmd: String,
    cmd_args: Vec<CmdArg>,
    input: String,
    expected: String,
}

pub struct CmdArg {
    key: String,
    vals: Vec<String>,
}

impl CmdArg {
    pub fn string(&self, idx: usize) -> String {
        self.vals[idx].clone()
    }
    pub fn int64(&self, idx: usize) -> i64 {
        self.parse(idx)
    }
    pub fn uint64(&self, idx: usize) -> u64 {
        self.parse(idx)
    }
    pub fn float64(&self, idx: usize) -> f64 {
        self.parse(idx)
    }
    pub fn bool(&self, idx: usize) -> bool {
        self.parse(idx)
    }

    fn parse<T: std::str::FromStr>(&self, idx: usize) -> T {
        match self.vals[idx].parse() {
            Ok(v) => v,
            Err(_) => panic!("cannot parse {}={}", self.key, self.vals[idx]),
        }
    }
}

impl TestData {
    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn find_arg(&self, key: &str) -> Option<&CmdArg> {
        self.cmd_args.iter().find(|&f| f.key == key)
    }
    pub fn scan_args(&self, key: &str) -> &CmdArg {
        if let Some(arg) = self.find_arg(key) {
            arg
        } else {
            panic!("{}: missing args: {}", self.pos, key);
        }
    }
    pub fn has_arg(&self, key: &str) -> bool {
        self.find_arg(key).is_some()
    }
}

pub fn run_test<F: FnMut(&TestData) -> String>(path: impl AsRef<Path>, f: F) {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => panic!("read {}: {}", path.display(), e),
    };
    run_cases(&content, &path.display().to_string(), f);
}

pub fn run_test_from_string<F: FnMut(&TestData) -> String>(input: impl AsRef<str>, f: F) {
    run_cases(input.as_ref(), "", f);
}

fn run_cases<F: FnMut(&TestData) -> String>(input: &str, source: &str, mut f: F) {
    for data in parse_test_data(input, source).iter() {
        let actual = f(data);
        assert_eq!(actual, data.expected, "{}: {}", data.pos, data.cmd);
    }
}

pub fn parse_test_data(input: &str, source: &str) -> Vec<TestData> {
    let directive = Regex::new(PATTERN).unwrap();
    let mut datas = Vec::new();

    let mut iter = input.lines().enumerate();
    while let Some((line_no, line)) = iter.next() {
        if line.starts_with('#') {
            continue;
        }
        let fields = split_directive(&directive, line);
        if fields.is_empty() {
            continue;
        }

        let mut data = TestData {
            pos: format!("{}:{}", source, line_no + 1),
            cmd: fields[0].clone(),
            ..Default::default()
        };
        for arg in &fields[1..] {
            data.cmd_args.push(parse_arg(arg));
        }

        let mut buf = String::new();
        let mut separator = false;
        for (_, line) in iter.by_ref() {
            if line == "----" {
                separator = true;
                break;
            }
            buf.push_str(line);
            buf.push('\n');
        }
        data.input = buf.trim().to_owned();

        if separator {
            let mut buf = String::new();
            for (_, line) in iter.by_ref() {
                let line = line.trim();
                if line.is_empty() {
                    break;
                }
                buf.push_str(line);
                buf.push('\n');
            }
            data.expected = buf;
        }
        datas.push(data);
    }

    datas
}

fn parse_arg(arg: &str) -> CmdArg {
    if let Some(idx) = arg.find('=') {
        let key = arg[0..idx].to_owned();
        let val = &arg[idx + 1..];

        let vals = if val.len() > 2 && val.starts_with('(') && val.ends_with(')') {
            val[1..val.len() - 1]
                .split(',')
                .map(|s| s.trim().to_owned())
                .collect()
        } else {
            vec![val.to_owned()]
        };
        CmdArg { key, vals }
    } else {
        CmdArg {
            key: arg.to_owned(),
            vals: Vec::new(),
        }
    }
}

const PATTERN: &str = r"^ *[a-zA-Z0-9_/,-\.]+(|=[-a-zA-Z0-9_.@]+|=\([^)]*\))( |$)";

fn split_directive(p: &Regex, mut line: &str) -> Vec<String> {
    let mut results = Vec::new();
    while !line.trim().is_empty() {
        let m = match p.find(line) {
            Some(m) => m,
            None => panic!("cannot parse directive: {}", line),
        };
        let v = m.as_str();
        line = &line[v.len()..];
        results.push(v.trim().to_string());
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_directive() {
        let p = Regex::new(PATTERN).unwrap();
        let input = "insert k=12 v=hello keys=(1, 2, 3) p=0.25 verbose";
        let cmds = split_directive(&p, input);
        assert_eq!(cmds.len(), 6);
        assert_eq!(cmds[0], "insert");
        assert_eq!(cmds[3], "keys=(1, 2, 3)");
        assert_eq!(cmds.last().unwrap(), "verbose");
    }

    #[test]
    fn test_parse_cases() {
        let input = r"
# comment lines are skipped
insert k=3 v=hello
----
ok

search k=(3, 4)
first line
second line
----
hello
not found
";
        let datas = parse_test_data(input, "inline");
        assert_eq!(datas.len(), 2);

        assert_eq!(datas[0].cmd(), "insert");
        assert_eq!(datas[0].scan_args("k").int64(0), 3);
        assert_eq!(datas[0].scan_args("v").string(0), "hello");
        assert_eq!(datas[0].expected, "ok\n");

        assert_eq!(datas[1].cmd(), "search");
        assert_eq!(datas[1].input(), "first line\nsecond line");
        let keys = datas[1].scan_args("k");
        assert_eq!(keys.uint64(0), 3);
        assert_eq!(keys.uint64(1), 4);
        assert_eq!(datas[1].expected, "hello\nnot found\n");
        assert!(!datas[1].has_arg("v"));
    }

    #[test]
    fn test_run_from_string() {
        let input = "
echo word=monkey twice=true
----
monkey monkey
";
        run_test_from_string(input, |t| {
            let word = t.scan_args("word").string(0);
            if t.scan_args("twice").bool(0) {
                format!("{} {}\n", word, word)
            } else {
                format!("{}\n", word)
            }
        });
    }
}
