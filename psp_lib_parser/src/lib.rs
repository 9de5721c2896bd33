// PSPLIB single-mode (.sm) files are line oriented, so every parser below
// consumes whole lines and only skips inline whitespace between columns.

use std::fmt;

use chumsky::{prelude::*, Parser};
use structs::{
    PspLibPrecedenceRelation, PspLibProblem, PspLibProblemResources, PspLibProjectInformation,
    PspLibRequestDuration,
};
use thiserror::Error;

pub mod structs;

#[derive(Debug, Error)]
pub enum PspLibParseError {
    #[error("ParseError occurred: {0:?}")]
    ParseError(Vec<Simple<char>>),
    #[error(
        "expected {expected} jobs, found {precedence} precedence relations and {requests} requests"
    )]
    JobCountMismatch {
        expected: usize,
        precedence: usize,
        requests: usize,
    },
    #[error("expected {expected} resource availabilities, found {found}")]
    ResourceCountMismatch { expected: usize, found: usize },
    #[error("job {job_number} requests {found} resources, expected {expected}")]
    RequestLengthMismatch {
        job_number: usize,
        expected: usize,
        found: usize,
    },
}

/// Parses a single-mode PSPLIB problem.
///
/// Request and availability rows carry one column per renewable, nonrenewable
/// and doubly constrained resource; only the renewable columns are kept.
pub fn parse_psp_lib(content: &str) -> Result<PspLibProblem, PspLibParseError> {
    let mut psp = problem_parser()
        .parse(content)
        .map_err(PspLibParseError::ParseError)?;

    if psp.precedence_relations.len() != psp.jobs || psp.request_durations.len() != psp.jobs {
        return Err(PspLibParseError::JobCountMismatch {
            expected: psp.jobs,
            precedence: psp.precedence_relations.len(),
            requests: psp.request_durations.len(),
        });
    }

    let columns = psp.resources.column_count();
    let renewable = psp.resources.renewable;

    if psp.resource_availabilities.len() != columns {
        return Err(PspLibParseError::ResourceCountMismatch {
            expected: columns,
            found: psp.resource_availabilities.len(),
        });
    }

    if let Some(request) = psp
        .request_durations
        .iter()
        .find(|request| request.requests.len() != columns)
    {
        return Err(PspLibParseError::RequestLengthMismatch {
            job_number: request.job_number,
            expected: columns,
            found: request.requests.len(),
        });
    }

    psp.resource_availabilities.truncate(renewable);
    for request in &mut psp.request_durations {
        request.requests.truncate(renewable);
    }

    Ok(psp)
}

struct Metadata {
    projects: usize,
    jobs: usize,
    horizon: usize,
    resources: PspLibProblemResources,
}

fn problem_parser() -> impl Parser<char, PspLibProblem, Error = Simple<char>> {
    file_metadata_parser()
        .then(metadata_parser())
        .then(project_info_parser())
        .then(precedence_relations_parser())
        .then(request_durations_parser())
        .then(resource_availabilities_parser())
        .then_ignore(separator().or_not())
        .then_ignore(text::whitespace())
        .then_ignore(end())
        .map(
            |(
                (
                    (
                        (((file_with_basedata, initial_rng), metadata), project_info),
                        precedence_relations,
                    ),
                    request_durations,
                ),
                resource_availabilities,
            )| PspLibProblem {
                file_with_basedata,
                initial_rng,
                projects: metadata.projects,
                jobs: metadata.jobs,
                horizon: metadata.horizon,
                resources: metadata.resources,
                project_info,
                precedence_relations,
                request_durations,
                resource_availabilities,
            },
        )
}

fn inline_whitespace() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    filter(|c: &char| *c == ' ' || *c == '\t')
        .repeated()
        .ignored()
}

fn line_end() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    text::newline().or(end())
}

fn rest_of_line() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    filter(|c: &char| *c != '\n' && *c != '\r')
        .repeated()
        .collect::<String>()
        .then_ignore(line_end())
}

fn number() -> impl Parser<char, usize, Error = Simple<char>> + Clone {
    text::int::<char, Simple<char>>(10)
        .try_map(|digits: String, span| {
            digits
                .parse::<usize>()
                .map_err(|err| Simple::custom(span, err.to_string()))
        })
        .labelled("number")
}

/// A line made only of whitespace separated unsigned integers.
fn number_row() -> impl Parser<char, Vec<usize>, Error = Simple<char>> + Clone {
    inline_whitespace()
        .ignore_then(
            number()
                .then_ignore(inline_whitespace())
                .repeated()
                .at_least(1),
        )
        .then_ignore(line_end())
}

fn separator() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    text::whitespace()
        .ignore_then(just('*').repeated().at_least(1))
        .ignore_then(rest_of_line())
        .ignored()
        .labelled("separator")
}

/// `label : value [unit]`
fn descriptor(label: &'static str) -> impl Parser<char, usize, Error = Simple<char>> + Clone {
    text::whitespace()
        .ignore_then(just(label))
        .ignore_then(inline_whitespace())
        .ignore_then(just(':'))
        .ignore_then(inline_whitespace())
        .ignore_then(number())
        .then_ignore(rest_of_line())
        .labelled(label)
}

/// Section title, its column header and an optional dashed underline.
fn section(title: &'static str) -> impl Parser<char, (), Error = Simple<char>> + Clone {
    let underline = inline_whitespace()
        .ignore_then(just('-').repeated().at_least(1))
        .ignore_then(rest_of_line());

    text::whitespace()
        .ignore_then(just(title))
        .ignore_then(rest_of_line())
        .ignore_then(rest_of_line())
        .ignore_then(underline.or_not())
        .ignored()
        .labelled(title)
}

pub(crate) fn file_metadata_parser() -> impl Parser<char, (String, usize), Error = Simple<char>> {
    let basedata = text::whitespace()
        .ignore_then(just("file with basedata"))
        .ignore_then(inline_whitespace())
        .ignore_then(just(':'))
        .ignore_then(inline_whitespace())
        .ignore_then(
            filter(|c: &char| !c.is_whitespace())
                .repeated()
                .at_least(1)
                .collect::<String>(),
        )
        .then_ignore(rest_of_line())
        .labelled("basedata");

    let initial_rng = descriptor("initial value random generator");

    separator().ignore_then(basedata).then(initial_rng)
}

fn metadata_parser() -> impl Parser<char, Metadata, Error = Simple<char>> {
    let resources_title = text::whitespace()
        .ignore_then(just("RESOURCES"))
        .ignore_then(rest_of_line());

    separator()
        .ignore_then(descriptor("projects"))
        .then(descriptor("jobs (incl. supersource/sink )"))
        .then(descriptor("horizon"))
        .then_ignore(resources_title)
        .then(descriptor("- renewable"))
        .then(descriptor("- nonrenewable"))
        .then(descriptor("- doubly constrained"))
        .map(
            |(((((projects, jobs), horizon), renewable), nonrenewable), doubly_constrained)| {
                Metadata {
                    projects,
                    jobs,
                    horizon,
                    resources: PspLibProblemResources {
                        renewable,
                        nonrenewable,
                        doubly_constrained,
                    },
                }
            },
        )
}

fn project_info_parser(
) -> impl Parser<char, Vec<PspLibProjectInformation>, Error = Simple<char>> {
    let info = number_row().try_map(|row, span| match row.as_slice() {
        [number, jobs, relative_date, due_date, tard_cost, mpm_time, ..] => {
            Ok(PspLibProjectInformation {
                number: *number,
                jobs: *jobs,
                relative_date: *relative_date,
                due_date: *due_date,
                tard_cost: *tard_cost,
                mpm_time: *mpm_time,
            })
        }
        _ => Err(Simple::custom(
            span,
            "project information needs at least six columns",
        )),
    });

    separator()
        .ignore_then(section("PROJECT INFORMATION:"))
        .ignore_then(info.repeated())
}

fn precedence_relations_parser(
) -> impl Parser<char, Vec<PspLibPrecedenceRelation>, Error = Simple<char>> {
    let relation = number_row().try_map(|row, span| match row.as_slice() {
        [job_number, mode_count, successor_count, successors @ ..]
            if successors.len() == *successor_count =>
        {
            Ok(PspLibPrecedenceRelation {
                job_number: *job_number,
                mode_count: *mode_count,
                successor_count: *successor_count,
                successors: successors.to_vec(),
            })
        }
        _ => Err(Simple::custom(span, "malformed precedence relation")),
    });

    separator()
        .ignore_then(section("PRECEDENCE RELATIONS:"))
        .ignore_then(relation.repeated())
}

fn request_durations_parser(
) -> impl Parser<char, Vec<PspLibRequestDuration>, Error = Simple<char>> {
    let request = number_row().try_map(|row, span| match row.as_slice() {
        [job_number, mode, duration, requests @ ..] => Ok(PspLibRequestDuration {
            job_number: *job_number,
            mode: *mode,
            duration: *duration,
            requests: requests.to_vec(),
        }),
        _ => Err(Simple::custom(span, "malformed request/duration")),
    });

    separator()
        .ignore_then(section("REQUESTS/DURATIONS:"))
        .ignore_then(request.repeated())
}

fn resource_availabilities_parser() -> impl Parser<char, Vec<usize>, Error = Simple<char>> {
    separator()
        .ignore_then(section("RESOURCEAVAILABILITIES:"))
        .ignore_then(number_row().or_not())
        .map(Option::unwrap_or_default)
}

const SEPARATOR: &str =
    "************************************************************************";

impl fmt::Display for PspLibProblem {
    /// Writes the problem back in the PSPLIB single-mode layout.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "file with basedata            : {}", self.file_with_basedata)?;
        writeln!(f, "initial value random generator: {}", self.initial_rng)?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "projects                      :  {}", self.projects)?;
        writeln!(f, "jobs (incl. supersource/sink ):  {}", self.jobs)?;
        writeln!(f, "horizon                       :  {}", self.horizon)?;
        writeln!(f, "RESOURCES")?;
        writeln!(f, "  - renewable                 :  {}   R", self.resources.renewable)?;
        writeln!(f, "  - nonrenewable              :  {}   N", self.resources.nonrenewable)?;
        writeln!(
            f,
            "  - doubly constrained        :  {}   D",
            self.resources.doubly_constrained
        )?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "PROJECT INFORMATION:")?;
        writeln!(f, "pronr.  #jobs rel.date duedate tardcost  MPM-Time")?;
        for info in &self.project_info {
            writeln!(
                f,
                "{:>5} {:>6} {:>6} {:>8} {:>8} {:>8}",
                info.number,
                info.jobs,
                info.relative_date,
                info.due_date,
                info.tard_cost,
                info.mpm_time
            )?;
        }
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "PRECEDENCE RELATIONS:")?;
        writeln!(f, "jobnr.    #modes  #successors   successors")?;
        for relation in &self.precedence_relations {
            write!(
                f,
                "{:>4} {:>8} {:>10}     ",
                relation.job_number, relation.mode_count, relation.successor_count
            )?;
            for successor in &relation.successors {
                write!(f, " {successor:>3}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "REQUESTS/DURATIONS:")?;
        write!(f, "jobnr. mode duration")?;
        for label in self.resources.column_labels() {
            write!(f, "  {label}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(SEPARATOR.len()))?;
        for request in &self.request_durations {
            write!(
                f,
                "{:>3} {:>6} {:>5}   ",
                request.job_number, request.mode, request.duration
            )?;
            for amount in &request.requests {
                write!(f, " {amount:>4}")?;
            }
            // ignored nonrenewable and doubly constrained requests
            for _ in self.resources.renewable..self.resources.column_count() {
                write!(f, " {:>4}", 0)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "RESOURCEAVAILABILITIES:")?;
        for label in self.resources.column_labels() {
            write!(f, "  {label}")?;
        }
        writeln!(f)?;
        for availability in &self.resource_availabilities {
            write!(f, " {availability:>4}")?;
        }
        for _ in self.resources.renewable..self.resources.column_count() {
            write!(f, " {:>4}", 0)?;
        }
        writeln!(f)?;
        writeln!(f, "{SEPARATOR}")
    }
}
