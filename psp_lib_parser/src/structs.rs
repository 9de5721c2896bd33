#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspLibProblem {
    // file metadata
    pub file_with_basedata: String,
    pub initial_rng: usize,
    // metadata
    pub projects: usize,
    pub jobs: usize,
    pub horizon: usize,
    pub resources: PspLibProblemResources,
    // project info
    pub project_info: Vec<PspLibProjectInformation>,
    // precedence relations
    pub precedence_relations: Vec<PspLibPrecedenceRelation>,
    // requests/duration
    pub request_durations: Vec<PspLibRequestDuration>,
    // resource availabilities, one entry per renewable resource
    pub resource_availabilities: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspLibProblemResources {
    pub renewable: usize,
    pub nonrenewable: usize,
    pub doubly_constrained: usize,
}

impl PspLibProblemResources {
    /// Number of request and availability columns in a PSPLIB file
    pub fn column_count(&self) -> usize {
        self.renewable + self.nonrenewable + self.doubly_constrained
    }

    /// Column headers, `R 1`, .., `N 1`, .., `D 1`, ..
    pub fn column_labels(&self) -> impl Iterator<Item = String> {
        let kinds = [
            ('R', self.renewable),
            ('N', self.nonrenewable),
            ('D', self.doubly_constrained),
        ];

        kinds
            .into_iter()
            .flat_map(|(kind, count)| (1..=count).map(move |index| format!("{kind} {index}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspLibProjectInformation {
    pub number: usize,
    pub jobs: usize,
    pub relative_date: usize,
    pub due_date: usize,
    pub tard_cost: usize,
    pub mpm_time: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspLibPrecedenceRelation {
    pub job_number: usize,
    pub mode_count: usize,
    pub successor_count: usize,
    pub successors: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspLibRequestDuration {
    pub job_number: usize,
    pub mode: usize,
    pub duration: usize,
    /// Renewable resource requests R1..Rn
    pub requests: Vec<usize>,
}
