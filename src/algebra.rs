//! Capability algebra: closed instruction vocabularies, their composition, and
//! dispatch to per-vocabulary handlers.
//!
//! A vocabulary is a plain enum implementing [`Vocabulary`]. Vocabularies are
//! combined with [`vocabulary!`](crate::vocabulary) into nested [`Sum`]s ending
//! in [`End`]; handlers are combined the same way with
//! [`interpreter!`](crate::interpreter). Dispatch is one exhaustive match per
//! [`Sum`] layer, so a composed vocabulary without a handler for every member
//! does not compile.

use std::marker::PhantomData;

use crate::codegen::{CodegenResult, CodegenSink, Contribution};
use crate::log::Log;
use crate::outcome::Outcome;

/// A closed set of instruction shapes for one generation concern.
pub trait Vocabulary {
    /// Answer produced by a handler for any instruction of this vocabulary.
    type Output;

    /// Short human-readable description of the instruction, for diagnostics.
    fn label(&self) -> String;
}

/// Executes every instruction of `V`.
pub trait Handler<V: Vocabulary> {
    fn handle(&mut self, term: V, log: Log) -> Outcome<V::Output>;
}

#[derive(Debug, Clone, PartialEq)]
/// Disjoint union of vocabulary `H` and the remaining vocabularies `T`.
pub enum Sum<H, T> {
    Head(H),
    Tail(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The empty vocabulary; terminates a [`Sum`] chain.
pub enum End {}

impl Vocabulary for End {
    type Output = End;

    fn label(&self) -> String {
        match *self {}
    }
}

impl<H: Vocabulary, T: Vocabulary> Vocabulary for Sum<H, T> {
    type Output = Sum<H::Output, T::Output>;

    fn label(&self) -> String {
        match self {
            Sum::Head(term) => term.label(),
            Sum::Tail(term) => term.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Handler for [`End`]; there is nothing to handle.
pub struct Unhandled;

impl Handler<End> for Unhandled {
    fn handle(&mut self, term: End, _log: Log) -> Outcome<End> {
        match term {}
    }
}

#[derive(Debug, Clone, Default)]
/// Handler for `Sum<V, W>` built from a handler for `V` and one for `W`.
pub struct Both<H, T> {
    pub head: H,
    pub tail: T,
}

impl<V, W, HV, HW> Handler<Sum<V, W>> for Both<HV, HW>
where
    V: Vocabulary,
    W: Vocabulary,
    HV: Handler<V>,
    HW: Handler<W>,
{
    fn handle(&mut self, term: Sum<V, W>, log: Log) -> Outcome<Sum<V::Output, W::Output>> {
        match term {
            Sum::Head(term) => self.head.handle(term, log).map(Sum::Head),
            Sum::Tail(term) => self.tail.handle(term, log).map(Sum::Tail),
        }
    }
}

/// Type-level index: the value sits in the head of a [`Sum`].
pub struct Here;

/// Type-level index: the value sits in the tail of a [`Sum`], at `I`.
pub struct There<I>(PhantomData<I>);

/// Lifts an instruction of a member vocabulary into the combined vocabulary.
///
/// `I` is inferred; callers never name it.
pub trait Inject<V, I> {
    fn inject(term: V) -> Self;
}

impl<H, T> Inject<H, Here> for Sum<H, T> {
    fn inject(term: H) -> Self {
        Sum::Head(term)
    }
}

impl<H, T, V, I> Inject<V, There<I>> for Sum<H, T>
where
    T: Inject<V, I>,
{
    fn inject(term: V) -> Self {
        Sum::Tail(T::inject(term))
    }
}

/// Recovers a member vocabulary's answer from a combined answer.
pub trait Project<O, I>: Sized {
    fn project(self) -> Result<O, Self>;
}

impl<H, T> Project<H, Here> for Sum<H, T> {
    fn project(self) -> Result<H, Self> {
        match self {
            Sum::Head(output) => Ok(output),
            other => Err(other),
        }
    }
}

impl<H, T, O, I> Project<O, There<I>> for Sum<H, T>
where
    T: Project<O, I>,
{
    fn project(self) -> Result<O, Self> {
        match self {
            Sum::Tail(rest) => rest.project().map_err(Sum::Tail),
            other => Err(other),
        }
    }
}

/// Combined vocabulary type: `vocabulary![A, B, C]` is `Sum<A, Sum<B, Sum<C, End>>>`.
#[macro_export]
macro_rules! vocabulary {
    () => { $crate::algebra::End };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::algebra::Sum<$head, $crate::vocabulary!($($tail),*)>
    };
}

/// Combined handler value matching [`vocabulary!`]: one handler per member, in order.
#[macro_export]
macro_rules! interpreter {
    () => { $crate::algebra::Unhandled };
    ($head:expr $(, $tail:expr)* $(,)?) => {
        $crate::algebra::Both {
            head: $head,
            tail: $crate::interpreter!($($tail),*),
        }
    };
}

/// An ordered sequence of instructions of the combined vocabulary `C`.
pub struct Program<C> {
    terms: Vec<C>,
}

impl<C> Default for Program<C> {
    fn default() -> Self {
        Self { terms: Vec::new() }
    }
}

impl<C> Program<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction of any member vocabulary.
    pub fn then<V, I>(mut self, term: V) -> Self
    where
        C: Inject<V, I>,
    {
        self.terms.push(C::inject(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<C> IntoIterator for Program<C> {
    type Item = C;
    type IntoIter = std::vec::IntoIter<C>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

/// Runs instructions of `C` through handler `H`, collecting every definition
/// they produce into a [`CodegenResult`] in execution order.
pub struct Interpreter<C, H> {
    handler: H,
    sink: CodegenSink,
    _vocabulary: PhantomData<fn(C)>,
}

impl<C, H> Interpreter<C, H>
where
    C: Vocabulary,
    C::Output: Contribution,
    H: Handler<C>,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            sink: CodegenSink::default(),
            _vocabulary: PhantomData,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Dispatches one combined instruction to its handler.
    pub fn dispatch(&mut self, term: C, log: Log) -> Outcome<C::Output> {
        tracing::trace!(target: "apigen", instruction = %term.label(), "dispatch");
        let sink = &mut self.sink;
        self.handler.handle(term, log).map(|output| {
            output.contribute(sink);
            output
        })
    }

    /// Dispatches an instruction of a member vocabulary and returns that
    /// vocabulary's own answer.
    pub fn exec<V, I>(&mut self, term: V, log: Log) -> Outcome<V::Output>
    where
        V: Vocabulary,
        C: Inject<V, I>,
        C::Output: Project<V::Output, I>,
    {
        let label = term.label();
        self.dispatch(C::inject(term), log)
            .and_then(|output, log| match output.project() {
                Ok(output) => Outcome::pure(output, log),
                Err(_) => Outcome::raise_internal(
                    format!("instruction '{label}' was answered by a handler of another vocabulary"),
                    log,
                ),
            })
    }

    /// Folds `program` through the handler, stopping at the first failure.
    pub fn run_program(&mut self, program: Program<C>, log: Log) -> Outcome<()> {
        let mut log = log;
        for term in program {
            let (_, next) = crate::bind!(self.dispatch(term, log));
            log = next;
        }
        Outcome::pure((), log)
    }

    /// Seals everything collected so far.
    pub fn finish(self) -> CodegenResult {
        self.sink.finish()
    }
}

/// Runs `program` to completion; a failed run yields no [`CodegenResult`].
pub fn run<C, H>(handler: H, program: Program<C>, log: Log) -> Outcome<CodegenResult>
where
    C: Vocabulary,
    C::Output: Contribution,
    H: Handler<C>,
{
    let mut interpreter = Interpreter::new(handler);
    interpreter
        .run_program(program, log)
        .map(|()| interpreter.finish())
}

#[cfg(test)]
mod tests {
    use super::{run, Handler, Interpreter, Program, Sum, Vocabulary};
    use crate::codegen::{CodegenSink, Contribution};
    use crate::error::ErrorKind;
    use crate::log::Log;
    use crate::outcome::Outcome;

    #[derive(Debug, Clone, PartialEq)]
    enum Greet {
        Hello(String),
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Greeting(String);

    impl Vocabulary for Greet {
        type Output = Greeting;

        fn label(&self) -> String {
            match self {
                Greet::Hello(name) => format!("hello {name}"),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Count {
        Add(u32),
        Explode,
    }

    impl Vocabulary for Count {
        type Output = u32;

        fn label(&self) -> String {
            match self {
                Count::Add(n) => format!("add {n}"),
                Count::Explode => "explode".to_string(),
            }
        }
    }

    impl Contribution for Greeting {
        fn contribute(&self, _sink: &mut CodegenSink) {}
    }

    impl Contribution for u32 {
        fn contribute(&self, _sink: &mut CodegenSink) {}
    }

    struct Greeter;

    impl Handler<Greet> for Greeter {
        fn handle(&mut self, term: Greet, log: Log) -> Outcome<Greeting> {
            match term {
                Greet::Hello(name) => {
                    let log = log.info(format!("greeting {name}"));
                    Outcome::pure(Greeting(format!("hello, {name}")), log)
                }
            }
        }
    }

    #[derive(Default)]
    struct Counter {
        total: u32,
    }

    impl Handler<Count> for Counter {
        fn handle(&mut self, term: Count, log: Log) -> Outcome<u32> {
            match term {
                Count::Add(n) => {
                    self.total += n;
                    Outcome::pure(self.total, log.debug(format!("total {}", self.total)))
                }
                Count::Explode => Outcome::raise_internal("counter exploded", log),
            }
        }
    }

    #[test]
    fn exec_routes_each_instruction_to_its_own_handler() {
        type V = crate::vocabulary![Greet, Count];
        let mut interpreter: Interpreter<V, _> =
            Interpreter::new(crate::interpreter![Greeter, Counter::default()]);

        let (greeting, log) = interpreter
            .exec(Greet::Hello("pets".to_string()), Log::new())
            .into_parts();
        assert_eq!(greeting, Ok(Greeting("hello, pets".to_string())));

        let (total, _) = interpreter.exec(Count::Add(3), log).into_parts();
        assert_eq!(total, Ok(3));
        assert_eq!(interpreter.handler().tail.head.total, 3);
    }

    #[test]
    fn behavior_does_not_depend_on_composition_order() {
        type Forward = crate::vocabulary![Greet, Count];
        type Backward = crate::vocabulary![Count, Greet];

        let mut forward: Interpreter<Forward, _> =
            Interpreter::new(crate::interpreter![Greeter, Counter::default()]);
        let mut backward: Interpreter<Backward, _> =
            Interpreter::new(crate::interpreter![Counter::default(), Greeter]);

        let a = forward.exec(Greet::Hello("x".to_string()), Log::new());
        let b = backward.exec(Greet::Hello("x".to_string()), Log::new());
        assert_eq!(a, b);

        let a = forward.exec(Count::Add(7), Log::new());
        let b = backward.exec(Count::Add(7), Log::new());
        assert_eq!(a, b);
    }

    #[test]
    fn failing_instruction_stops_the_program_and_keeps_prior_log() {
        type V = crate::vocabulary![Greet, Count];
        let program: Program<V> = Program::new()
            .then(Greet::Hello("first".to_string()))
            .then(Count::Explode)
            .then(Count::Add(1));
        assert_eq!(program.len(), 3);

        let handler = crate::interpreter![Greeter, Counter::default()];
        let (result, log) = run(handler, program, Log::new()).into_parts();

        let error = result.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Internal);
        let messages: Vec<_> = log.entries().iter().map(|e| e.message()).collect();
        assert_eq!(messages, vec!["greeting first"]);
    }

    struct Confused;

    impl Handler<crate::vocabulary![Greet, Count]> for Confused {
        fn handle(
            &mut self,
            _term: crate::vocabulary![Greet, Count],
            log: Log,
        ) -> Outcome<Sum<Greeting, Sum<u32, super::End>>> {
            Outcome::pure(Sum::Tail(Sum::Head(0)), log)
        }
    }

    #[test]
    fn mismatched_answer_is_an_internal_error() {
        type V = crate::vocabulary![Greet, Count];
        let mut interpreter: Interpreter<V, _> = Interpreter::new(Confused);
        let out = interpreter.exec(Greet::Hello("x".to_string()), Log::new());
        assert_eq!(out.error().map(|e| e.kind()), Some(ErrorKind::Internal));
    }
}
