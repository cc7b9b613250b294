//! The fixed registry of functions and constants visible to formulas.
//!
//! Columns may never shadow these names; see `expr::evaluate`.

use crate::expr::error::{EvalError, EvalResult};
use crate::expr::eval::{map_numeric, zip_numeric};
use crate::expr::value::Value;
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;

pub type BuiltinFn = fn(Vec<Value>) -> EvalResult<Value>;

/// A named, callable built-in function
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: BuiltinFn,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: Vec<Value>) -> EvalResult<Value> {
        (self.func)(args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

enum Binding {
    Function(BuiltinFn),
    Constant(f64),
    Module,
}

const REGISTRY: &[(&str, Binding)] = &[
    ("sqrt", Binding::Function(sqrt)),
    ("sin", Binding::Function(sin)),
    ("cos", Binding::Function(cos)),
    ("tan", Binding::Function(tan)),
    ("asin", Binding::Function(asin)),
    ("acos", Binding::Function(acos)),
    ("atan", Binding::Function(atan)),
    ("atan2", Binding::Function(atan2)),
    ("cosh", Binding::Function(cosh)),
    ("sinh", Binding::Function(sinh)),
    ("tanh", Binding::Function(tanh)),
    ("sinc", Binding::Function(sinc)),
    ("pi", Binding::Constant(PI)),
    ("log", Binding::Function(log)),
    ("exp", Binding::Function(exp)),
    ("floor", Binding::Function(floor)),
    ("ceil", Binding::Function(ceil)),
    ("abs", Binding::Function(abs)),
    ("radians", Binding::Function(radians)),
    ("degrees", Binding::Function(degrees)),
    ("int", Binding::Function(int)),
    ("float", Binding::Function(float)),
    ("bool", Binding::Function(bool)),
    ("clip", Binding::Function(clip)),
    ("hypot", Binding::Function(hypot)),
    ("mod", Binding::Function(modulo)),
    ("round", Binding::Function(round)),
    // Functions that generate floats
    ("average", Binding::Function(average)),
    ("mean", Binding::Function(mean)),
    ("median", Binding::Function(median)),
    ("dot", Binding::Function(dot)),
    // Functions that generate arrays
    ("array", Binding::Function(array)),
    ("cumprod", Binding::Function(cumprod)),
    ("cumsum", Binding::Function(cumsum)),
    ("arange", Binding::Function(arange)),
    ("diff", Binding::Function(diff)),
    ("interp", Binding::Function(interp)),
    ("linspace", Binding::Function(linspace)),
    ("ones", Binding::Function(ones)),
    ("sort", Binding::Function(sort)),
    ("zeros", Binding::Function(zeros)),
    // Random
    ("random", Binding::Function(random)),
    ("uniform", Binding::Function(uniform)),
    ("normal", Binding::Function(normal)),
    // The numeric-library handle
    ("np", Binding::Module),
];

/// Only reachable as `np.<name>`
const NUMPY_EXTRAS: &[(&str, Binding)] = &[
    ("sum", Binding::Function(sum)),
    ("min", Binding::Function(min)),
    ("max", Binding::Function(max)),
    ("std", Binding::Function(std_dev)),
    ("var", Binding::Function(var)),
    ("prod", Binding::Function(prod)),
    ("log10", Binding::Function(log10)),
    ("log2", Binding::Function(log2)),
    ("sign", Binding::Function(sign)),
    ("isnan", Binding::Function(isnan)),
    ("arcsin", Binding::Function(asin)),
    ("arccos", Binding::Function(acos)),
    ("arctan", Binding::Function(atan)),
    ("arctan2", Binding::Function(atan2)),
    ("e", Binding::Constant(std::f64::consts::E)),
    ("inf", Binding::Constant(f64::INFINITY)),
    ("nan", Binding::Constant(f64::NAN)),
];

/// Names of every registered built-in, in registry order
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Value bound to a registry name
pub fn lookup(name: &str) -> Option<Value> {
    find(REGISTRY, name)
}

/// Value of `np.<name>`
pub fn numpy_attribute(name: &str) -> Option<Value> {
    if name == "np" {
        return None;
    }
    find(REGISTRY, name).or_else(|| find(NUMPY_EXTRAS, name))
}

fn find(table: &'static [(&'static str, Binding)], name: &str) -> Option<Value> {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(n, binding)| match binding {
            Binding::Function(func) => Value::Function(Builtin { name: *n, func: *func }),
            Binding::Constant(c) => Value::Number(*c),
            Binding::Module => Value::Module,
        })
}

fn take<const N: usize>(name: &str, args: Vec<Value>) -> EvalResult<[Value; N]> {
    args.try_into().map_err(|args: Vec<Value>| EvalError::Arity {
        function: name.to_string(),
        expected: N.to_string(),
        actual: args.len(),
    })
}

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> EvalResult<()> {
    if args.len() < min || args.len() > max {
        return Err(EvalError::Arity {
            function: name.to_string(),
            expected: format!("{} to {}", min, max),
            actual: args.len(),
        });
    }
    Ok(())
}

fn scalar(name: &str, value: &Value) -> EvalResult<f64> {
    value.as_number().ok_or_else(|| {
        EvalError::TypeError(format!(
            "{}() expects a scalar argument, got {}",
            name,
            value.type_name()
        ))
    })
}

/// Largest array a constructor may build
pub const MAX_ARRAY_LEN: usize = 10_000_000;

fn check_len(name: &str, n: f64) -> EvalResult<usize> {
    if n > MAX_ARRAY_LEN as f64 {
        return Err(EvalError::invalid(
            name,
            format!("array length {} exceeds the limit of {}", n, MAX_ARRAY_LEN),
        ));
    }
    Ok(n as usize)
}

fn count(name: &str, value: &Value) -> EvalResult<usize> {
    let n = scalar(name, value)?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
        return Err(EvalError::invalid(
            name,
            format!("expected a non-negative integer, got {}", n),
        ));
    }
    check_len(name, n)
}

fn values(name: &str, value: Value) -> EvalResult<Vec<f64>> {
    value.into_array(&format!("{}()", name))
}

macro_rules! elementwise {
    ($($fn_name:ident => $name:literal, $f:expr;)*) => {
        $(
            fn $fn_name(args: Vec<Value>) -> EvalResult<Value> {
                let [x] = take::<1>($name, args)?;
                map_numeric($name, x, $f)
            }
        )*
    };
}

elementwise! {
    sqrt => "sqrt", f64::sqrt;
    sin => "sin", f64::sin;
    cos => "cos", f64::cos;
    tan => "tan", f64::tan;
    asin => "asin", f64::asin;
    acos => "acos", f64::acos;
    atan => "atan", f64::atan;
    cosh => "cosh", f64::cosh;
    sinh => "sinh", f64::sinh;
    tanh => "tanh", f64::tanh;
    sinc => "sinc", |x: f64| if x == 0.0 { 1.0 } else { (PI * x).sin() / (PI * x) };
    log => "log", f64::ln;
    log10 => "log10", f64::log10;
    log2 => "log2", f64::log2;
    exp => "exp", f64::exp;
    floor => "floor", f64::floor;
    ceil => "ceil", f64::ceil;
    abs => "abs", f64::abs;
    radians => "radians", f64::to_radians;
    degrees => "degrees", f64::to_degrees;
    int => "int", f64::trunc;
    float => "float", |x: f64| x;
    sign => "sign", |x: f64| if x == 0.0 || x.is_nan() { x } else { x.signum() };
    isnan => "isnan", |x: f64| if x.is_nan() { 1.0 } else { 0.0 };
}

fn bool(args: Vec<Value>) -> EvalResult<Value> {
    let [x] = take::<1>("bool", args)?;
    match x {
        Value::Array(_) => map_numeric("bool", x, |v| if v != 0.0 { 1.0 } else { 0.0 }),
        other => Ok(Value::Bool(other.truthy())),
    }
}

fn atan2(args: Vec<Value>) -> EvalResult<Value> {
    let [y, x] = take::<2>("atan2", args)?;
    zip_numeric("atan2", y, x, f64::atan2)
}

fn hypot(args: Vec<Value>) -> EvalResult<Value> {
    let [a, b] = take::<2>("hypot", args)?;
    zip_numeric("hypot", a, b, f64::hypot)
}

/// Remainder with the sign of the divisor
pub(crate) fn python_mod(a: f64, b: f64) -> f64 {
    a - b * (a / b).floor()
}

fn modulo(args: Vec<Value>) -> EvalResult<Value> {
    let [a, b] = take::<2>("mod", args)?;
    zip_numeric("mod", a, b, python_mod)
}

fn clip(args: Vec<Value>) -> EvalResult<Value> {
    let [a, lo, hi] = take::<3>("clip", args)?;
    let lower = zip_numeric("clip", a, lo, f64::max)?;
    zip_numeric("clip", lower, hi, f64::min)
}

fn round(args: Vec<Value>) -> EvalResult<Value> {
    arity("round", &args, 1, 2)?;
    let mut args = args.into_iter();
    let x = args.next().unwrap_or(Value::None);
    let decimals = match args.next() {
        Some(d) => {
            let d = scalar("round", &d)?;
            if d.fract() != 0.0 {
                return Err(EvalError::invalid("round", "decimals must be an integer"));
            }
            d as i32
        }
        None => 0,
    };
    let scale = 10f64.powi(decimals);
    // numpy rounds half to even
    map_numeric("round", x, move |v| (v * scale).round_ties_even() / scale)
}

fn mean_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean(args: Vec<Value>) -> EvalResult<Value> {
    let [a] = take::<1>("mean", args)?;
    Ok(Value::Number(mean_of(&values("mean", a)?)))
}

fn average(args: Vec<Value>) -> EvalResult<Value> {
    arity("average", &args, 1, 2)?;
    let mut args = args.into_iter();
    let a = values("average", args.next().unwrap_or(Value::None))?;
    let Some(weights) = args.next() else {
        return Ok(Value::Number(mean_of(&a)));
    };

    let weights = values("average", weights)?;
    if weights.len() != a.len() {
        return Err(EvalError::ShapeMismatch {
            left: a.len(),
            right: weights.len(),
        });
    }
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return Err(EvalError::invalid("average", "weights sum to zero"));
    }
    let weighted: f64 = a.iter().zip(&weights).map(|(x, w)| x * w).sum();
    Ok(Value::Number(weighted / total))
}

fn median(args: Vec<Value>) -> EvalResult<Value> {
    let [a] = take::<1>("median", args)?;
    let mut sorted = values("median", a)?;
    if sorted.is_empty() {
        return Ok(Value::Number(f64::NAN));
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    Ok(Value::Number(median))
}

fn dot(args: Vec<Value>) -> EvalResult<Value> {
    let [a, b] = take::<2>("dot", args)?;
    match (a, b) {
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Err(EvalError::ShapeMismatch {
                    left: a.len(),
                    right: b.len(),
                });
            }
            Ok(Value::Number(a.iter().zip(&b).map(|(x, y)| x * y).sum()))
        }
        (a, b) => zip_numeric("dot", a, b, |x, y| x * y),
    }
}

fn array(args: Vec<Value>) -> EvalResult<Value> {
    let [a] = take::<1>("array", args)?;
    Ok(Value::Array(values("array", a)?))
}

fn cumsum(args: Vec<Value>) -> EvalResult<Value> {
    let [a] = take::<1>("cumsum", args)?;
    let mut total = 0.0;
    let out = values("cumsum", a)?
        .into_iter()
        .map(|v| {
            total += v;
            total
        })
        .collect();
    Ok(Value::Array(out))
}

fn cumprod(args: Vec<Value>) -> EvalResult<Value> {
    let [a] = take::<1>("cumprod", args)?;
    let mut total = 1.0;
    let out = values("cumprod", a)?
        .into_iter()
        .map(|v| {
            total *= v;
            total
        })
        .collect();
    Ok(Value::Array(out))
}

fn arange(args: Vec<Value>) -> EvalResult<Value> {
    arity("arange", &args, 1, 3)?;
    let nums = args
        .iter()
        .map(|a| scalar("arange", a))
        .collect::<EvalResult<Vec<f64>>>()?;
    let (start, stop, step) = match nums.as_slice() {
        [stop] => (0.0, *stop, 1.0),
        [start, stop] => (*start, *stop, 1.0),
        [start, stop, step] => (*start, *stop, *step),
        _ => unreachable!("arity checked above"),
    };
    if !start.is_finite() || !stop.is_finite() {
        return Err(EvalError::invalid("arange", "start and stop must be finite"));
    }
    if step == 0.0 || !step.is_finite() {
        return Err(EvalError::invalid("arange", "step must be finite and non-zero"));
    }
    let n = check_len("arange", ((stop - start) / step).ceil().max(0.0))?;
    Ok(Value::Array((0..n).map(|i| start + i as f64 * step).collect()))
}

fn diff(args: Vec<Value>) -> EvalResult<Value> {
    let [a] = take::<1>("diff", args)?;
    let a = values("diff", a)?;
    Ok(Value::Array(a.windows(2).map(|w| w[1] - w[0]).collect()))
}

fn interp_one(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let last = xp.len() - 1;
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }
    let i = xp.partition_point(|p| *p <= x) - 1;
    let t = (x - xp[i]) / (xp[i + 1] - xp[i]);
    fp[i] + t * (fp[i + 1] - fp[i])
}

fn interp(args: Vec<Value>) -> EvalResult<Value> {
    let [x, xp, fp] = take::<3>("interp", args)?;
    let xp = values("interp", xp)?;
    let fp = values("interp", fp)?;
    if xp.len() != fp.len() {
        return Err(EvalError::ShapeMismatch {
            left: xp.len(),
            right: fp.len(),
        });
    }
    if xp.is_empty() {
        return Err(EvalError::invalid("interp", "xp and fp must not be empty"));
    }
    map_numeric("interp", x, |v| interp_one(v, &xp, &fp))
}

fn linspace(args: Vec<Value>) -> EvalResult<Value> {
    arity("linspace", &args, 2, 3)?;
    let start = scalar("linspace", &args[0])?;
    let stop = scalar("linspace", &args[1])?;
    let num = match args.get(2) {
        Some(n) => count("linspace", n)?,
        None => 50,
    };
    let out = match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + i as f64 * step })
                .collect()
        }
    };
    Ok(Value::Array(out))
}

fn ones(args: Vec<Value>) -> EvalResult<Value> {
    let [n] = take::<1>("ones", args)?;
    Ok(Value::Array(vec![1.0; count("ones", &n)?]))
}

fn zeros(args: Vec<Value>) -> EvalResult<Value> {
    let [n] = take::<1>("zeros", args)?;
    Ok(Value::Array(vec![0.0; count("zeros", &n)?]))
}

fn sort(args: Vec<Value>) -> EvalResult<Value> {
    let [a] = take::<1>("sort", args)?;
    let mut a = values("sort", a)?;
    a.sort_by(f64::total_cmp);
    Ok(Value::Array(a))
}

/// Draw one sample, or `size` samples when a size is given
fn sample(name: &str, size: Option<&Value>, mut draw: impl FnMut() -> f64) -> EvalResult<Value> {
    match size {
        None => Ok(Value::Number(draw())),
        Some(size) => {
            let n = count(name, size)?;
            Ok(Value::Array((0..n).map(|_| draw()).collect()))
        }
    }
}

fn random(args: Vec<Value>) -> EvalResult<Value> {
    arity("random", &args, 0, 1)?;
    let mut rng = rand::thread_rng();
    sample("random", args.first(), || rng.gen::<f64>())
}

fn uniform(args: Vec<Value>) -> EvalResult<Value> {
    arity("uniform", &args, 0, 3)?;
    let low = args.first().map(|a| scalar("uniform", a)).transpose()?.unwrap_or(0.0);
    let high = args.get(1).map(|a| scalar("uniform", a)).transpose()?.unwrap_or(1.0);
    let mut rng = rand::thread_rng();
    sample("uniform", args.get(2), || low + (high - low) * rng.gen::<f64>())
}

fn normal(args: Vec<Value>) -> EvalResult<Value> {
    arity("normal", &args, 0, 3)?;
    let loc = args.first().map(|a| scalar("normal", a)).transpose()?.unwrap_or(0.0);
    let scale = args.get(1).map(|a| scalar("normal", a)).transpose()?.unwrap_or(1.0);
    if scale < 0.0 {
        return Err(EvalError::invalid("normal", "scale must be non-negative"));
    }
    let mut rng = rand::thread_rng();
    // Box-Muller; 1 - u keeps the log argument in (0, 1]
    sample("normal", args.get(2), || {
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen::<f64>();
        loc + scale * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    })
}

fn reduce(name: &str, args: Vec<Value>, f: impl FnOnce(&[f64]) -> EvalResult<f64>) -> EvalResult<Value> {
    let [a] = take::<1>(name, args)?;
    Ok(Value::Number(f(&values(name, a)?)?))
}

fn sum(args: Vec<Value>) -> EvalResult<Value> {
    reduce("sum", args, |a| Ok(a.iter().sum()))
}

fn prod(args: Vec<Value>) -> EvalResult<Value> {
    reduce("prod", args, |a| Ok(a.iter().product()))
}

fn min(args: Vec<Value>) -> EvalResult<Value> {
    reduce("min", args, |a| {
        a.iter()
            .copied()
            .reduce(f64::min)
            .ok_or_else(|| EvalError::invalid("min", "zero-size array has no minimum"))
    })
}

fn max(args: Vec<Value>) -> EvalResult<Value> {
    reduce("max", args, |a| {
        a.iter()
            .copied()
            .reduce(f64::max)
            .ok_or_else(|| EvalError::invalid("max", "zero-size array has no maximum"))
    })
}

fn variance(a: &[f64]) -> f64 {
    let m = mean_of(a);
    mean_of(&a.iter().map(|x| (x - m).powi(2)).collect::<Vec<_>>())
}

fn var(args: Vec<Value>) -> EvalResult<Value> {
    reduce("var", args, |a| Ok(variance(a)))
}

fn std_dev(args: Vec<Value>) -> EvalResult<Value> {
    reduce("std", args, |a| Ok(variance(a).sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Value>) -> EvalResult<Value> {
        match lookup(name).or_else(|| numpy_attribute(name)) {
            Some(Value::Function(f)) => f.call(args),
            other => panic!("{} is not a function: {:?}", name, other),
        }
    }

    fn arr(values: &[f64]) -> Value {
        Value::Array(values.to_vec())
    }

    #[test]
    fn test_registry_names() {
        let names: Vec<&str> = names().collect();
        assert_eq!(names.len(), 45);
        assert_eq!(names.first(), Some(&"sqrt"));
        assert_eq!(names.last(), Some(&"np"));
        assert!(super::names().any(|n| n == "sin"));
        assert!(!super::names().any(|n| n == "sum"));
    }

    #[test]
    fn test_constants_and_module() {
        assert_eq!(lookup("pi"), Some(Value::Number(PI)));
        assert_eq!(lookup("np"), Some(Value::Module));
        assert_eq!(numpy_attribute("e"), Some(Value::Number(std::f64::consts::E)));
        assert_eq!(numpy_attribute("np"), None);
        assert!(numpy_attribute("sqrt").is_some());
    }

    #[test]
    fn test_elementwise_on_arrays() {
        assert_eq!(call("sqrt", vec![arr(&[4.0, 9.0])]), Ok(arr(&[2.0, 3.0])));
        assert_eq!(call("abs", vec![Value::Number(-2.0)]), Ok(Value::Number(2.0)));
        assert_eq!(call("int", vec![arr(&[1.7, -1.7])]), Ok(arr(&[1.0, -1.0])));
        assert_eq!(call("sinc", vec![Value::Number(0.0)]), Ok(Value::Number(1.0)));
    }

    #[test]
    fn test_arity_errors() {
        assert!(matches!(
            call("sin", vec![]),
            Err(EvalError::Arity { actual: 0, .. })
        ));
        assert!(matches!(
            call("atan2", vec![Value::Number(1.0)]),
            Err(EvalError::Arity { actual: 1, .. })
        ));
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(
            call("round", vec![arr(&[0.5, 1.5, 2.5])]),
            Ok(arr(&[0.0, 2.0, 2.0]))
        );
        assert_eq!(
            call("round", vec![Value::Number(3.14159), Value::Number(2.0)]),
            Ok(Value::Number(3.14))
        );
    }

    #[test]
    fn test_mod_follows_divisor_sign() {
        assert_eq!(
            call("mod", vec![Value::Number(-1.0), Value::Number(3.0)]),
            Ok(Value::Number(2.0))
        );
    }

    #[test]
    fn test_clip() {
        assert_eq!(
            call("clip", vec![arr(&[-1.0, 0.5, 2.0]), Value::Number(0.0), Value::Number(1.0)]),
            Ok(arr(&[0.0, 0.5, 1.0]))
        );
    }

    #[test]
    fn test_aggregates() {
        let a = arr(&[3.0, 1.0, 2.0, 10.0]);
        assert_eq!(call("mean", vec![a.clone()]), Ok(Value::Number(4.0)));
        assert_eq!(call("median", vec![a.clone()]), Ok(Value::Number(2.5)));
        assert_eq!(call("sum", vec![a.clone()]), Ok(Value::Number(16.0)));
        assert_eq!(call("max", vec![a.clone()]), Ok(Value::Number(10.0)));
        assert_eq!(
            call("average", vec![arr(&[1.0, 3.0]), arr(&[3.0, 1.0])]),
            Ok(Value::Number(1.5))
        );
        assert_eq!(
            call("dot", vec![arr(&[1.0, 2.0]), arr(&[3.0, 4.0])]),
            Ok(Value::Number(11.0))
        );
        assert!(call("min", vec![arr(&[])]).is_err());
    }

    #[test]
    fn test_array_constructors() {
        assert_eq!(call("arange", vec![Value::Number(3.0)]), Ok(arr(&[0.0, 1.0, 2.0])));
        assert_eq!(
            call("arange", vec![Value::Number(1.0), Value::Number(2.0), Value::Number(0.5)]),
            Ok(arr(&[1.0, 1.5]))
        );
        assert_eq!(
            call("linspace", vec![Value::Number(0.0), Value::Number(1.0), Value::Number(5.0)]),
            Ok(arr(&[0.0, 0.25, 0.5, 0.75, 1.0]))
        );
        assert_eq!(call("zeros", vec![Value::Number(2.0)]), Ok(arr(&[0.0, 0.0])));
        assert_eq!(call("cumsum", vec![arr(&[1.0, 2.0, 3.0])]), Ok(arr(&[1.0, 3.0, 6.0])));
        assert_eq!(call("cumprod", vec![arr(&[1.0, 2.0, 3.0])]), Ok(arr(&[1.0, 2.0, 6.0])));
        assert_eq!(call("diff", vec![arr(&[1.0, 4.0, 9.0])]), Ok(arr(&[3.0, 5.0])));
        assert_eq!(call("sort", vec![arr(&[3.0, 1.0, 2.0])]), Ok(arr(&[1.0, 2.0, 3.0])));
        assert!(call("ones", vec![Value::Number(-1.0)]).is_err());
        assert!(call("arange", vec![Value::Number(0.0), Value::Number(1.0), Value::Number(0.0)]).is_err());
    }

    #[test]
    fn test_oversized_arrays_are_rejected() {
        let huge = Value::Number(1e19);
        let n = |v: f64| Value::Number(v);
        let cases = vec![
            ("zeros", vec![huge.clone()]),
            ("ones", vec![huge.clone()]),
            ("random", vec![huge.clone()]),
            ("uniform", vec![n(0.0), n(1.0), huge.clone()]),
            ("normal", vec![n(0.0), n(1.0), huge.clone()]),
            ("linspace", vec![n(0.0), n(1.0), huge.clone()]),
            ("arange", vec![huge.clone()]),
            ("arange", vec![n(0.0), n(f64::INFINITY)]),
            ("arange", vec![n(f64::NEG_INFINITY), n(0.0)]),
            ("arange", vec![n(0.0), n(1.0), n(1e-12)]),
        ];
        for (name, args) in cases {
            let result = call(name, args);
            assert!(
                matches!(result, Err(EvalError::InvalidArgument { .. })),
                "{} gave {:?}",
                name,
                result
            );
        }

        assert!(call("zeros", vec![n(MAX_ARRAY_LEN as f64 + 1.0)]).is_err());
    }

    #[test]
    fn test_interp_clamps_ends() {
        let xp = arr(&[0.0, 1.0, 2.0]);
        let fp = arr(&[0.0, 10.0, 40.0]);
        assert_eq!(
            call("interp", vec![arr(&[-1.0, 0.5, 1.5, 3.0]), xp, fp]),
            Ok(arr(&[0.0, 5.0, 25.0, 40.0]))
        );
    }

    #[test]
    fn test_random_shapes() {
        let Ok(Value::Array(samples)) = call("uniform", vec![
            Value::Number(2.0),
            Value::Number(3.0),
            Value::Number(100.0),
        ]) else {
            panic!("expected an array");
        };
        assert_eq!(samples.len(), 100);
        assert!(samples.iter().all(|s| (2.0..3.0).contains(s)));

        assert!(matches!(call("random", vec![]), Ok(Value::Number(_))));
        let Ok(Value::Array(normals)) = call("normal", vec![
            Value::Number(0.0),
            Value::Number(1.0),
            Value::Number(10.0),
        ]) else {
            panic!("expected an array");
        };
        assert!(normals.iter().all(|n| n.is_finite()));
    }
}
