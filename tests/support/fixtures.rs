//! Test fixtures and constants.

/// Flask backend exposing 5000.
pub const FLASK_DOCKERFILE: &str = "\
FROM python:3.12-slim
WORKDIR /app
RUN pip install flask
COPY . .
EXPOSE 5000
CMD [\"python\", \"app.py\"]
";

/// nginx frontend exposing 80.
pub const NGINX_DOCKERFILE: &str = "\
FROM nginx:alpine
COPY dist /usr/share/nginx/html
EXPOSE 80
";

/// Go service with no role markers.
pub const WORKER_DOCKERFILE: &str = "\
FROM golang:1.22 AS build
WORKDIR /src
COPY . .
RUN go build -o /worker
EXPOSE 9000
";

/// `.env` naming a database host and password.
pub const DATABASE_ENV: &str = "\
# database
DATABASE_HOST=postgres
DATABASE_PASSWORD=x
LOG_LEVEL=info
";

pub const INIT_SQL: &str = "CREATE TABLE items (id serial PRIMARY KEY, name text);\n";

/// Files of the full-stack project.
pub const FULL_STACK: &[(&str, &str)] = &[
    ("backend/Dockerfile", FLASK_DOCKERFILE),
    ("frontend/Dockerfile", NGINX_DOCKERFILE),
    (".env", DATABASE_ENV),
    ("init.sql", INIT_SQL),
];
